//! CLI argument parsing and command dispatch.

pub mod args;
pub mod generate;
pub mod predict;
pub mod serve;
pub mod status;

use serde::Serialize;

pub use args::{Cli, Commands};

use crate::error::Result;

/// Print a value as JSON on stdout.
///
/// # Errors
///
/// Returns error if the value cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
