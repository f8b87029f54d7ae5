//! Error types for the todo API client.
//!
//! # Design
//! Every non-2xx response becomes `ApiError::Http` carrying the status and a
//! message; callers branch on the status code, not on error kinds. Network
//! failures never reach this type: the host executes the I/O and reports
//! transport errors through its own channel.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with an unexpected status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build an `Http` error from a response. The message is the body text,
    /// or the status line when the body is blank.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            status_line(status)
        } else {
            body.to_string()
        };
        ApiError::Http { status, message }
    }

    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn status_line(status: u16) -> String {
    match ::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
    {
        Some(reason) => format!("{status} {reason}"),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_body_text() {
        let err = ApiError::from_response(422, r#"{"code":"validation_failed"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 422,
                message: r#"{"code":"validation_failed"}"#.to_string()
            }
        );
    }

    #[test]
    fn blank_body_falls_back_to_status_line() {
        let err = ApiError::from_response(404, "");
        assert_eq!(err.to_string(), "HTTP 404: 404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_status_has_bare_code() {
        let err = ApiError::from_response(599, " ");
        assert_eq!(err.status(), Some(599));
        assert_eq!(err.to_string(), "HTTP 599: 599");
    }

    #[test]
    fn codec_errors_have_no_status() {
        assert_eq!(ApiError::Deserialization("eof".into()).status(), None);
    }
}
