//! Market Model
//!
//! Owns the agent collections and the global parameters. Responsible for
//! population lifecycle, market-wide shocks, aggregate statistics, and
//! validated reconfiguration.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Buyer, MarketParams, Seller, TradeProtocol, ValidationError};

/// Aggregate market observation for one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Sellers currently quoting within bounds (post-clamp this is the
    /// active seller count; reproduced faithfully from the source model)
    pub supply_count: usize,
    /// Sum of all buyers' remaining demand
    pub demand_count: f64,
}

/// The two-sided market: buyers, sellers, and their shared parameters
#[derive(Debug, Clone)]
pub struct MarketModel {
    buyers: Vec<Buyer>,
    sellers: Vec<Seller>,
    params: MarketParams,
    protocol: TradeProtocol,
}

impl MarketModel {
    /// Create a model with freshly randomized agent populations
    pub fn new<R: Rng>(
        buyer_count: usize,
        seller_count: usize,
        params: MarketParams,
        protocol: TradeProtocol,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        params.validate()?;
        let mut model = Self {
            buyers: Vec::new(),
            sellers: Vec::new(),
            params,
            protocol,
        };
        model.initialize(buyer_count, seller_count, rng);
        Ok(model)
    }

    /// Atomically replace both populations with freshly randomized agents
    ///
    /// Callable repeatedly; counts are reproduced exactly, values are
    /// re-drawn each call.
    pub fn initialize<R: Rng>(&mut self, buyer_count: usize, seller_count: usize, rng: &mut R) {
        self.buyers = (0..buyer_count).map(|_| Buyer::random(rng)).collect();
        self.sellers = (0..seller_count)
            .map(|_| Seller::random(&self.params, rng))
            .collect();
    }

    /// Replace the global parameters, validating first
    ///
    /// On rejection nothing is applied. On success the three parameters are
    /// swapped atomically; sellers whose quotes fall outside the new bounds
    /// are not re-clamped until their next re-quote or shock.
    pub fn reconfigure(&mut self, params: MarketParams) -> Result<(), ValidationError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Run one market-wide shock trial
    ///
    /// A single Bernoulli(shock_probability) draw gates the whole market:
    /// on success every seller's quote is re-drawn from the configured
    /// range. Returns whether the shock fired.
    pub fn apply_external_shock<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !rng.gen_bool(self.params.shock_probability) {
            return false;
        }
        for seller in &mut self.sellers {
            seller.price = rng.gen_range(self.params.min_price..self.params.max_price);
        }
        true
    }

    /// Compute the aggregate supply/demand observation
    pub fn aggregate_statistics(&self) -> MarketStats {
        let supply_count = self
            .sellers
            .iter()
            .filter(|s| s.price <= self.params.max_price)
            .count();
        let demand_count = self.buyers.iter().map(|b| b.demand).sum();
        MarketStats {
            supply_count,
            demand_count,
        }
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.buyers.len(), self.sellers.len())
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn protocol(&self) -> TradeProtocol {
        self.protocol
    }

    pub fn buyers(&self) -> &[Buyer] {
        &self.buyers
    }

    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    /// Execute one trade attempt between the indexed buyer and seller
    ///
    /// The seller is re-quoted first, then the buyer's trade primitive runs
    /// under the model's protocol. Returns whether the trade executed.
    /// Panics on out-of-range indices; callers draw them from `counts()`.
    pub fn trade<R: Rng>(&mut self, buyer_idx: usize, seller_idx: usize, rng: &mut R) -> bool {
        let seller = &mut self.sellers[seller_idx];
        seller.requote(&self.params, rng);
        self.buyers[buyer_idx].buy(seller, &self.params, self.protocol, rng)
    }
}
