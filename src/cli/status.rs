//! Status command implementation.

use serde::Serialize;

use super::print_json;
use crate::core::ollama::OllamaClient;
use crate::error::Result;
use crate::storage::ResolvedConfig;

#[derive(Debug, Serialize)]
struct StatusOutput<'a> {
    running: bool,
    url: &'a str,
    model: &'a str,
}

/// Execute the status command.
///
/// An offline service is a normal result, not an error.
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built or output fails.
pub async fn execute(config: &ResolvedConfig) -> Result<()> {
    let client = OllamaClient::new(config.ollama.clone())?;
    let running = client.is_running().await;

    if config.json {
        return print_json(
            &StatusOutput {
                running,
                url: client.base_url(),
                model: client.model(),
            },
            config.pretty,
        );
    }

    if running {
        println!("Ollama is running at {} (model: {})", client.base_url(), client.model());
    } else {
        println!(
            "Ollama is not reachable at {}; predictions will use local fallbacks",
            client.base_url()
        );
    }
    Ok(())
}
