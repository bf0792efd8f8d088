//! HTTP routes. Handlers only translate between HTTP and the composer.

use crate::composer::{
    supported_language_details, ComposedResponse, FeedComposer, SupportedLanguage,
};
use crate::errors::{attempt_async, ErrorBody, FeedError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// `{error, data}` wrapper; exactly one side is non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub error: Option<ErrorBody>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            error: None,
            data: Some(data),
        }
    }

    pub fn error(error: ErrorBody) -> Self {
        Self {
            error: Some(error),
            data: None,
        }
    }
}

pub fn router(composer: Arc<FeedComposer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/feed/:lang/featured/:year/:month/:day", get(featured_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(composer)
}

async fn health() -> &'static str {
    "OK"
}

async fn languages() -> Json<Vec<SupportedLanguage>> {
    Json(supported_language_details())
}

/// GET /feed/:lang/featured/:year/:month/:day
async fn featured_feed(
    State(composer): State<Arc<FeedComposer>>,
    Path((lang, year, month, day)): Path<(String, String, String, String)>,
) -> (StatusCode, Json<Envelope<ComposedResponse>>) {
    match attempt_async(composer.compose_feed(&lang, &year, &month, &day)).await {
        Ok(Ok(response)) => (StatusCode::OK, Json(Envelope::data(response))),
        Ok(Err(e)) => (status_for(&e), Json(Envelope::error(e.to_body()))),
        Err(panic) => {
            error!(
                "Composing {} {}-{}-{} panicked: {}",
                lang, year, month, day, panic
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::error(ErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "Internal server error".to_string(),
                })),
            )
        }
    }
}

fn status_for(error: &FeedError) -> StatusCode {
    match error {
        FeedError::BadRequest(_) => StatusCode::BAD_REQUEST,
        FeedError::Upstream(_) | FeedError::Translation(_) => StatusCode::BAD_GATEWAY,
    }
}
