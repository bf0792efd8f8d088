//! Error taxonomy and result helpers.
//!
//! Expected failures travel as `Result<T, FeedError>`. Panics are reserved for
//! programmer errors; `attempt` and `attempt_async` are the only places where a
//! panic is turned back into a value.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Errors that cross component boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Invalid date or unsupported language. Caused by the client, never retried.
    #[error("{0}")]
    BadRequest(String),

    /// Network or parse failure talking to the upstream feed service.
    #[error("{0}")]
    Upstream(String),

    /// Network, parse or configuration failure talking to the translation service.
    #[error("{0}")]
    Translation(String),
}

impl FeedError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FeedError::BadRequest(_) => "BAD_REQUEST",
            FeedError::Upstream(_) => "WIKIPEDIA_API_ERROR",
            FeedError::Translation(_) => "TRANSLATION_API_ERROR",
        }
    }

    /// The `{code, message}` shape handed to callers.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

/// Structured error as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Run `f`, converting a panic into `Err` with the panic message.
pub fn attempt<T, F>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

/// Await `fut`, converting a panic into `Err` with the panic message.
pub async fn attempt_async<T, Fut>(fut: Fut) -> Result<T, String>
where
    Fut: Future<Output = T>,
{
    AssertUnwindSafe(fut).catch_unwind().await.map_err(panic_message)
}

/// Unwrap a value that is guaranteed to be present.
///
/// Only for internal invariants, never for data that came from the network.
///
/// # Panics
/// Panics with a message naming `what` if `value` is `None`.
pub fn non_null<T>(value: Option<T>, what: &str) -> T {
    match value {
        Some(value) => value,
        None => panic!("{} is unexpectedly absent", what),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(FeedError::BadRequest("x".into()).code(), "BAD_REQUEST");
        assert_eq!(FeedError::Upstream("x".into()).code(), "WIKIPEDIA_API_ERROR");
        assert_eq!(
            FeedError::Translation("x".into()).code(),
            "TRANSLATION_API_ERROR"
        );
    }

    #[test]
    fn test_to_body_carries_message() {
        let body = FeedError::BadRequest("Invalid date".to_string()).to_body();
        assert_eq!(body.code, "BAD_REQUEST");
        assert_eq!(body.message, "Invalid date");
    }

    #[test]
    fn test_error_body_serialization() {
        let body = FeedError::Upstream("boom".to_string()).to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "WIKIPEDIA_API_ERROR", "message": "boom" })
        );
    }

    #[test]
    fn test_attempt_ok() {
        assert_eq!(attempt(|| 2 + 2), Ok(4));
    }

    #[test]
    fn test_attempt_captures_panic_message() {
        let result: Result<(), String> = attempt(|| panic!("exploded"));
        assert_eq!(result, Err("exploded".to_string()));
    }

    #[test]
    fn test_attempt_captures_formatted_panic() {
        let result: Result<(), String> = attempt(|| panic!("code {}", 42));
        assert_eq!(result, Err("code 42".to_string()));
    }

    #[tokio::test]
    async fn test_attempt_async_ok() {
        let result = attempt_async(async { "done" }).await;
        assert_eq!(result, Ok("done"));
    }

    #[tokio::test]
    async fn test_attempt_async_captures_panic() {
        let result: Result<(), String> = attempt_async(async { panic!("async boom") }).await;
        assert_eq!(result, Err("async boom".to_string()));
    }

    #[test]
    fn test_non_null_present() {
        assert_eq!(non_null(Some(7), "seven"), 7);
    }

    #[test]
    #[should_panic(expected = "registry entry is unexpectedly absent")]
    fn test_non_null_absent_panics() {
        let _: u8 = non_null(None, "registry entry");
    }
}
