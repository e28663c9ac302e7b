//! Configuration errors raised at construction time.

use thiserror::Error;

/// Invalid parameters rejected before any integration happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("{what} must be positive and finite, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("{what} must be non-negative and finite, got {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("inertia tensor is not positive definite")]
    InvalidInertia,

    #[error("initial pitch {0} rad is within the Euler-angle singularity band")]
    GimbalLock(f64),

    #[error("tick step {got} does not match the configured step {expected}")]
    StepMismatch { expected: f64, got: f64 },

    #[error("initial state contains a non-finite value")]
    NonFiniteState,
}

/// Require `value > 0` and finite.
pub fn require_positive(what: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { what, value })
    }
}

/// Require `value >= 0` and finite.
pub fn require_non_negative(what: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { what, value })
    }
}

/// Require a usable fixed step.
pub fn require_time_step(dt: f64) -> Result<f64, ConfigError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(ConfigError::InvalidTimeStep(dt))
    }
}
