//! Validation Error Types

use thiserror::Error;

/// Error type for configuration validation
///
/// The only failure surface of the crate. All in-step arithmetic operates on
/// pre-validated parameter ranges and cannot fail; rejecting bad input here
/// leaves prior simulation state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Price bounds must satisfy min < max
    #[error("invalid price bounds: min {min} must be below max {max}")]
    PriceBounds { min: f64, max: f64 },

    /// Shock probability must be a probability
    #[error("shock probability {0} outside [0, 1]")]
    ShockProbability(f64),
}
