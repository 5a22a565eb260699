//! HTTP/1.1 API server.
//!
//! One tokio task per connection; handlers share an [`AppState`] behind an
//! `Arc` and hold no mutable state.

pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::core::engine::PredictionEngine;
use crate::error::Result;

/// Everything a request handler needs.
#[derive(Debug)]
pub struct AppState {
    pub engine: PredictionEngine,
    /// Sales series served by `/api/data`.
    pub sales_path: PathBuf,
    /// Project records served by `/api/project-data`.
    pub projects_path: PathBuf,
}

/// Serve on a bound listener until Ctrl-C.
///
/// # Errors
///
/// Returns error if the listener has no local address.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(%local, "Prediction API listening");

    serve_until(listener, Arc::new(state), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Accept connections on `listener` until `shutdown` resolves.
///
/// In-flight connections keep running on their own tasks after shutdown.
///
/// # Errors
///
/// Currently infallible; accept errors are logged and skipped.
pub async fn serve_until<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => spawn_connection(stream, peer, Arc::clone(&state)),
                    Err(e) => tracing::warn!(error = %e, "Failed to accept connection"),
                }
            }
            () = &mut shutdown => {
                tracing::info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    Ok(())
}

fn spawn_connection(stream: tokio::net::TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { routes::handle(req, &state).await }
        });

        if let Err(e) = http1::Builder::new()
            .serve_connection(TokioIo::new(stream), service)
            .await
        {
            tracing::debug!(%peer, error = %e, "Connection closed with error");
        }
    });
}
