//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every target must be a probe-able http(s) URL
//! - Value ranges (deadline > 0, metrics address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::DispatchConfig;
use crate::http::target::{parse_target, TargetError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error("run.deadline_ms must be greater than zero")]
    ZeroDeadline,
    #[error("run.label must not be empty")]
    EmptyLabel,
    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for target in &config.targets {
        if let Err(e) = parse_target(target) {
            errors.push(e.into());
        }
    }

    if config.run.deadline_ms == Some(0) {
        errors.push(ValidationError::ZeroDeadline);
    }

    if config.run.label.trim().is_empty() {
        errors.push(ValidationError::EmptyLabel);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
