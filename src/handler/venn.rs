//! Diagram generation endpoint
//!
//! Parses the request body, renders the chart on the blocking pool and answers
//! with the PNG. Every failure becomes the same 500 JSON response.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::task::JoinError;

use crate::config::AppState;
use crate::diagram::RenderError;
use crate::http;
use crate::logger;
use crate::stakeholder::{render_chart, VennRequest};

pub const VENN_PATH: &str = "/stakeholder-venn";

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Bad JSON, missing `categorias`, a missing bucket or a non-string entry
    #[error("{0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("{0}")]
    Render(#[from] RenderError),
    /// The render task panicked or was cancelled
    #[error("render task failed: {0}")]
    Worker(#[from] JoinError),
}

impl GenerateError {
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPayload(_))
    }

    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid payload",
            Self::Render(_) | Self::Worker(_) => "render failure",
        }
    }
}

/// Render the chart described by `body` into PNG bytes
pub async fn generate(body: &[u8], state: &Arc<AppState>) -> Result<Vec<u8>, GenerateError> {
    let request = VennRequest::from_slice(body)?;
    let state = Arc::clone(state);

    let png = tokio::task::spawn_blocking(move || {
        render_chart(&request.categories, &state.chart, &state.fonts)
    })
    .await??;

    Ok(png)
}

pub async fn handle_venn(body: &[u8], state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match generate(body, state).await {
        Ok(png) => http::build_png_response(png),
        Err(err) => {
            logger::log_generation_failed(err.category(), &err);
            http::build_error_response(&err.to_string())
        }
    }
}
