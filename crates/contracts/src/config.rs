//! Operator configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::FlowError;

/// Construction-time operator configuration.
///
/// Fixed once the pipeline graph is built; nothing here mutates during
/// steady-state operation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OperatorConfig {
    /// Diagnostic label (used in logs and metrics)
    #[validate(length(min = 1, message = "operator name must not be empty"))]
    pub name: String,

    /// Opaque storage/session location hint, forwarded to the Collector
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
}

impl OperatorConfig {
    /// Create a config with just a diagnostic name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            session_dir: None,
        }
    }

    /// Validate the configuration, mapping failures into [`FlowError`].
    pub fn check(&self) -> Result<(), FlowError> {
        self.validate().map_err(|e| {
            let detail = e
                .field_errors()
                .into_iter()
                .next()
                .and_then(|(field, errors)| {
                    errors.first().map(|err| {
                        (
                            field.to_string(),
                            err.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| err.code.to_string()),
                        )
                    })
                });
            match detail {
                Some((field, message)) => FlowError::config_validation(field, message),
                None => FlowError::config_validation("config", e.to_string()),
            }
        })
    }
}
