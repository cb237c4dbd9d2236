//! Typed request errors carrying the numeric-prefix response contract.
//!
//! Callers of the webhook parse response bodies by their status-code prefix
//! (`"400 Bad Request; ..."`), so the prefix is part of `Display` rather than
//! something the transport glues on.

use std::fmt;

/// Coarse failure class; the transport maps this to an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Forbidden,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::Internal => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::Internal => "Internal Server Error",
        }
    }
}

/// A request-scoped failure. Validation errors carry the dotted property path
/// of the offending field (e.g. `$.entry[].messaging[].message.mid`).
#[derive(Debug, Clone, thiserror::Error)]
pub struct WebhookError {
    pub kind: ErrorKind,
    pub property_path: Option<String>,
    pub message: String,
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}; {}",
            self.kind.code(),
            self.kind.reason(),
            self.message
        )
    }
}

impl WebhookError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::BadRequest,
            property_path: None,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Forbidden,
            property_path: None,
            message: message.into(),
        }
    }

    /// Generic 500-class error. Callers log the underlying detail themselves;
    /// only `message` ever reaches the remote caller.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            property_path: None,
            message: message.into(),
        }
    }

    pub fn missing_property(path: &str) -> Self {
        Self {
            kind: ErrorKind::BadRequest,
            property_path: Some(path.to_string()),
            message: format!("missing property: {path}"),
        }
    }

    pub fn bad_value(path: &str, description: &str) -> Self {
        Self {
            kind: ErrorKind::BadRequest,
            property_path: Some(path.to_string()),
            message: format!("bad value: {path} {description}"),
        }
    }

    pub fn empty_value(path: &str) -> Self {
        Self::bad_value(path, "cannot be 'None' or empty.")
    }
}
