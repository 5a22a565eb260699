//! Request routing and handlers for the prediction API.
//!
//! | Method | Path                   | Response                         |
//! |--------|------------------------|----------------------------------|
//! | GET    | `/api/status`          | `{ running }`                    |
//! | GET    | `/api/data`            | sales series from disk           |
//! | GET    | `/api/project-data`    | project records from disk        |
//! | POST   | `/api/predict`         | `{ prediction, method }`         |
//! | POST   | `/api/predict-success` | success prediction with stats    |
//!
//! Errors are `{ error, code }` with 400 for caller mistakes, 404 for unknown
//! routes, and 500 for everything else.

use std::convert::Infallible;
use std::time::Instant;

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use super::AppState;
use crate::core::models::{PerformanceRecord, SalesPoint, SuccessRequest};
use crate::error::{Result, TrendcastError};
use crate::storage::datasets;

/// Response body type.
pub type Body = Full<Bytes>;

/// Largest request body accepted.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct PredictBody {
    data: Option<Vec<SalesPoint>>,
}

#[derive(Debug, Deserialize)]
struct PredictSuccessBody {
    user: Option<String>,
    category: Option<String>,
    data: Option<Vec<PerformanceRecord>>,
    #[serde(rename = "forceAI")]
    force_ai: Option<bool>,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    running: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'a str,
}

/// Dispatch one request. Never fails; errors become JSON responses.
pub async fn handle(
    req: Request<Incoming>,
    state: &AppState,
) -> std::result::Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let result = match (&method, path.as_str()) {
        (&Method::GET, "/api/status") => status(state).await,
        (&Method::GET, "/api/data") => sales_data(state).await,
        (&Method::GET, "/api/project-data") => project_data(state).await,
        (&Method::POST, "/api/predict") => predict(req, state).await,
        (&Method::POST, "/api/predict-success") => predict_success(req, state).await,
        _ => Ok(not_found(&method, &path)),
    };

    let response = result.unwrap_or_else(|e| error_response(&e));
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis();
    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, "Request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, "Request rejected");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "Request handled");
    }
    Ok(response)
}

async fn status(state: &AppState) -> Result<Response<Body>> {
    let running = state.engine.remote_status().await;
    Ok(json_response(StatusCode::OK, &StatusBody { running }))
}

async fn sales_data(state: &AppState) -> Result<Response<Body>> {
    let points = datasets::load_sales(&state.sales_path).await?;
    Ok(json_response(StatusCode::OK, &points))
}

async fn project_data(state: &AppState) -> Result<Response<Body>> {
    let records = datasets::load_projects(&state.projects_path).await?;
    Ok(json_response(StatusCode::OK, &records))
}

async fn predict(req: Request<Incoming>, state: &AppState) -> Result<Response<Body>> {
    let body: PredictBody = read_body(req).await?;
    let points = body.data.ok_or_else(|| TrendcastError::missing("data"))?;
    let prediction = state.engine.predict_value(&points).await?;
    Ok(json_response(StatusCode::OK, &prediction))
}

async fn predict_success(req: Request<Incoming>, state: &AppState) -> Result<Response<Body>> {
    let body: PredictSuccessBody = read_body(req).await?;
    let request = SuccessRequest::from_parts(
        body.user,
        body.category,
        body.data,
        body.force_ai.unwrap_or(false),
    )?;
    let prediction = state.engine.predict_success(&request).await?;
    Ok(json_response(StatusCode::OK, &prediction))
}

/// Collect and decode a JSON request body.
async fn read_body<T: DeserializeOwned>(req: Request<Incoming>) -> Result<T> {
    let bytes = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| TrendcastError::InvalidInput(format!("unreadable request body: {e}")))?
        .to_bytes();
    serde_json::from_slice(&bytes)
        .map_err(|e| TrendcastError::InvalidInput(format!("malformed JSON body: {e}")))
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_vec(value) {
        Ok(bytes) => build_response(status, bytes),
        Err(e) => error_response(&TrendcastError::Json(e)),
    }
}

fn error_response(err: &TrendcastError) -> Response<Body> {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    tracing::debug!(error = %err, code = err.error_code(), "Rendering error response");
    error_body(status, err.to_string(), err.error_code())
}

fn not_found(method: &Method, path: &str) -> Response<Body> {
    error_body(
        StatusCode::NOT_FOUND,
        format!("no route for {method} {path}"),
        "TC-Q404",
    )
}

fn error_body(status: StatusCode, error: String, code: &str) -> Response<Body> {
    let body = ErrorBody { error, code };
    // ErrorBody holds only strings
    let bytes = serde_json::to_vec(&body).unwrap_or_default();
    build_response(status, bytes)
}

fn build_response(status: StatusCode, bytes: Vec<u8>) -> Response<Body> {
    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
