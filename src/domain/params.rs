//! Market Parameters
//!
//! Global simulation parameters, owned by the market model and mutated only
//! through validated reconfiguration.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Global market parameters
///
/// Created at initialization, replaced atomically by `reconfigure`, read by
/// every step and shock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Lower bound of the quoted price range
    pub min_price: f64,
    /// Upper bound of the quoted price range
    pub max_price: f64,
    /// Probability that a shock trial re-randomizes all seller prices (0-1)
    pub shock_probability: f64,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            min_price: 10.0,
            max_price: 100.0,
            shock_probability: 0.1,
        }
    }
}

impl MarketParams {
    pub fn new(min_price: f64, max_price: f64, shock_probability: f64) -> Self {
        Self {
            min_price,
            max_price,
            shock_probability,
        }
    }

    /// Check the parameter invariants: min < max, probability in [0, 1]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.min_price < self.max_price) {
            return Err(ValidationError::PriceBounds {
                min: self.min_price,
                max: self.max_price,
            });
        }
        if !(0.0..=1.0).contains(&self.shock_probability) {
            return Err(ValidationError::ShockProbability(self.shock_probability));
        }
        Ok(())
    }

    /// Clamp a candidate price into the configured range
    pub fn clamp_price(&self, price: f64) -> f64 {
        price.clamp(self.min_price, self.max_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(MarketParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let params = MarketParams::new(5.0, 1.0, 0.1);
        assert_eq!(
            params.validate(),
            Err(ValidationError::PriceBounds { min: 5.0, max: 1.0 })
        );
    }

    #[test]
    fn rejects_equal_bounds() {
        assert!(MarketParams::new(10.0, 10.0, 0.1).validate().is_err());
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        assert!(MarketParams::new(1.0, 2.0, 1.5).validate().is_err());
        assert!(MarketParams::new(1.0, 2.0, -0.1).validate().is_err());
        assert!(MarketParams::new(1.0, 2.0, 0.0).validate().is_ok());
        assert!(MarketParams::new(1.0, 2.0, 1.0).validate().is_ok());
    }

    #[test]
    fn clamps_into_range() {
        let params = MarketParams::new(10.0, 100.0, 0.1);
        assert_eq!(params.clamp_price(5.0), 10.0);
        assert_eq!(params.clamp_price(250.0), 100.0);
        assert_eq!(params.clamp_price(42.0), 42.0);
    }
}
