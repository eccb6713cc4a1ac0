//! Configuration error types.

use thiserror::Error;

/// Configuration validation error.
///
/// Every variant names the offending field by its dotted path, e.g.
/// `capital.total_capital`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
        value: String,
    },
    #[error("{field} is required: {reason}")]
    Missing {
        field: &'static str,
        reason: &'static str,
    },
    #[error("{field} {constraint}")]
    Inconsistent {
        field: &'static str,
        constraint: String,
    },
    #[error("exit_policy.tiers[{index}].{field} must be {constraint}, got {value}")]
    InvalidTier {
        index: usize,
        field: &'static str,
        constraint: &'static str,
        value: f64,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: &'static str,
        constraint: &'static str,
        value: impl ToString,
    ) -> Self {
        ConfigError::OutOfRange {
            field,
            constraint,
            value: value.to_string(),
        }
    }

    /// Dotted path of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::OutOfRange { field, .. }
            | ConfigError::Missing { field, .. }
            | ConfigError::Inconsistent { field, .. } => field,
            ConfigError::InvalidTier { .. } => "exit_policy.tiers",
        }
    }
}

// Range checks. NaN never passes.
pub(crate) const POSITIVE: &str = "positive";
pub(crate) const NON_NEGATIVE: &str = "non-negative";
pub(crate) const FRACTION: &str = "in (0, 1]";
pub(crate) const CLOSED_FRACTION: &str = "in [0, 1]";

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::out_of_range(field, POSITIVE, value));
    }
    Ok(())
}

pub(crate) fn require_positive_int(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::out_of_range(field, POSITIVE, value));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::out_of_range(field, NON_NEGATIVE, value));
    }
    Ok(())
}

/// Value must lie in (0, 1].
pub(crate) fn require_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 || value > 1.0 {
        return Err(ConfigError::out_of_range(field, FRACTION, value));
    }
    Ok(())
}

/// Value must lie in [0, 1].
pub(crate) fn require_closed_fraction(
    field: &'static str,
    value: f64,
) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::out_of_range(field, CLOSED_FRACTION, value));
    }
    Ok(())
}
