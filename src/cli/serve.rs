//! Serve command implementation.

use tokio::net::TcpListener;

use crate::core::engine::PredictionEngine;
use crate::error::Result;
use crate::server::{self, AppState};
use crate::storage::ResolvedConfig;

/// Execute the serve command.
///
/// # Errors
///
/// Returns `Io` if the listen address cannot be bound.
pub async fn execute(config: &ResolvedConfig) -> Result<()> {
    let engine = PredictionEngine::new(config.ollama.clone(), config.seed)?;
    let state = AppState {
        engine,
        sales_path: config.sales_path(),
        projects_path: config.projects_path(),
    };

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let local = listener.local_addr()?;
    tracing::info!(
        ollama = %config.ollama.base_url,
        model = %config.ollama.model,
        data_dir = %config.data_dir.display(),
        seeded = config.seed.is_some(),
        "Starting prediction API"
    );
    println!("Server running at http://{local}");

    server::serve(listener, state).await
}
