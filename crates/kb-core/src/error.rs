//! Core error types for the kanban client
//!
//! Every failure of a backend call is folded into [`KbError`], whatever its transport cause.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Core error type for all client operations
#[derive(Error, Debug, Clone)]
pub enum KbError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Server responded with {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors collection, keyed by field
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => describe_validation_code(&error.code),
                };
                errors.add(field, message);
            }
        }
        errors
    }
}

impl From<validator::ValidationErrors> for KbError {
    fn from(source: validator::ValidationErrors) -> Self {
        KbError::Validation(source.into())
    }
}

fn describe_validation_code(code: &str) -> String {
    match code {
        "length" => "has an invalid length".to_string(),
        "required" => "is required".to_string(),
        other => format!("is invalid ({})", other),
    }
}

impl KbError {
    /// Map a non-success HTTP status and its message to an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => KbError::BadRequest { message },
            401 => KbError::Unauthorized { message },
            403 => KbError::Forbidden { message },
            404 => KbError::NotFound { message },
            409 => KbError::Conflict { message },
            422 => {
                let mut errors = ValidationErrors::new();
                errors.add_base(message);
                KbError::Validation(errors)
            }
            429 => KbError::RateLimited { message },
            _ => KbError::Remote { status, message },
        }
    }

    /// HTTP status this error corresponds to, if it came from the server
    pub fn status_code(&self) -> Option<u16> {
        match self {
            KbError::NotFound { .. } => Some(404),
            KbError::Unauthorized { .. } => Some(401),
            KbError::Forbidden { .. } => Some(403),
            KbError::BadRequest { .. } => Some(400),
            KbError::Conflict { .. } => Some(409),
            KbError::Validation(_) => Some(422),
            KbError::RateLimited { .. } => Some(429),
            KbError::Remote { status, .. } => Some(*status),
            KbError::Transport(_)
            | KbError::Decode(_)
            | KbError::Config(_)
            | KbError::Internal(_) => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            KbError::NotFound { .. } => "not_found",
            KbError::Unauthorized { .. } => "unauthorized",
            KbError::Forbidden { .. } => "forbidden",
            KbError::BadRequest { .. } => "bad_request",
            KbError::Conflict { .. } => "conflict",
            KbError::Validation(_) => "validation_failed",
            KbError::RateLimited { .. } => "rate_limited",
            KbError::Remote { .. } => "remote_error",
            KbError::Transport(_) => "transport_error",
            KbError::Decode(_) => "decode_error",
            KbError::Config(_) => "configuration_error",
            KbError::Internal(_) => "internal_error",
        }
    }
}
