//! Layered error definitions
//!
//! Categorized by source: config / delegate execution. The core never
//! swallows or retries a fault - every error surfaces verbatim to the
//! immediate caller of `receive`, and recovery policy belongs to the
//! external scheduler.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum FlowError {
    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Transform delegate fault
    #[error("transform execution error: {message}")]
    TransformExecution {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl FlowError {
    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create transform execution error
    pub fn transform(message: impl Into<String>) -> Self {
        Self::TransformExecution {
            message: message.into(),
            source: None,
        }
    }

    /// Create transform execution error wrapping an underlying cause
    pub fn transform_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TransformExecution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
