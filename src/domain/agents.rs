//! Buyer and Seller Agents
//!
//! The two agent types of the model. Each holds its own economic state and
//! exposes a single trade primitive; a rejected trade is a silent no-op.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::MarketParams;

/// Initial cash range for freshly created agents (both sides)
pub const INITIAL_CASH_RANGE: (f64, f64) = (100.0, 200.0);
/// Initial demand range for freshly created buyers
pub const INITIAL_DEMAND_RANGE: (f64, f64) = (1.0, 5.0);

/// Trade protocol variant governing `Buyer::buy`
///
/// The source material carries two inconsistent buy semantics; they are
/// modeled as named strategies and fixed per market model, never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TradeProtocol {
    /// Transfer cash at the willingness price; buyer demand is untouched
    PriceOnly,
    /// Transfer cash at the willingness price and decrement buyer demand by 1
    #[default]
    DemandTracking,
}

/// Buyer agent
///
/// Holds spendable cash and remaining desired units. Cash never goes
/// negative: a purchase that would overdraw is not executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Buyer {
    pub cash: f64,
    pub demand: f64,
}

impl Buyer {
    pub fn new(cash: f64, demand: f64) -> Self {
        Self { cash, demand }
    }

    /// Create a buyer with cash and demand drawn from the initial ranges
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            cash: rng.gen_range(INITIAL_CASH_RANGE.0..INITIAL_CASH_RANGE.1),
            demand: rng.gen_range(INITIAL_DEMAND_RANGE.0..INITIAL_DEMAND_RANGE.1),
        }
    }

    /// Attempt to buy one unit from `seller`
    ///
    /// Draws a willingness price uniformly from the configured range
    /// (independent of the seller's quote). The trade executes iff the
    /// seller quotes at or below the willingness price and the buyer can
    /// afford it; the transfer then happens at the willingness price, which
    /// is the governing trade price. Returns whether the trade executed.
    pub fn buy<R: Rng>(
        &mut self,
        seller: &mut Seller,
        params: &MarketParams,
        protocol: TradeProtocol,
        rng: &mut R,
    ) -> bool {
        let willingness = rng.gen_range(params.min_price..params.max_price);
        if seller.price > willingness || self.cash < willingness {
            return false;
        }

        self.cash -= willingness;
        seller.cash += willingness;
        if protocol == TradeProtocol::DemandTracking {
            self.demand = (self.demand - 1.0).max(0.0);
        }
        true
    }
}

/// Seller agent
///
/// Holds accumulated proceeds and a quoted unit price. The quote stays
/// inside the configured bounds at every observable point; re-quotes and
/// shocks overwrite it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seller {
    pub cash: f64,
    pub price: f64,
}

impl Seller {
    pub fn new(cash: f64, price: f64) -> Self {
        Self { cash, price }
    }

    /// Create a seller with random cash and a quote drawn within bounds
    pub fn random<R: Rng>(params: &MarketParams, rng: &mut R) -> Self {
        let price = rng.gen_range(params.min_price..params.max_price);
        Self {
            cash: rng.gen_range(INITIAL_CASH_RANGE.0..INITIAL_CASH_RANGE.1),
            price: params.clamp_price(price),
        }
    }

    /// Attempt to sell one unit to `buyer` at the quoted price
    ///
    /// Dual of `Buyer::buy`, offered for symmetry. Executes iff the buyer
    /// still wants at least one unit and can afford the quote; the transfer
    /// happens at the quoted price and decrements the buyer's demand by 1.
    pub fn sell(&mut self, buyer: &mut Buyer) -> bool {
        if buyer.demand < 1.0 || buyer.cash < self.price {
            return false;
        }

        self.cash += self.price;
        buyer.cash -= self.price;
        buyer.demand -= 1.0;
        true
    }

    /// Overwrite the quote with a fresh draw from the configured range
    ///
    /// The draw is clamped before assignment; redundant under stable
    /// parameters, but guards against a reconfiguration racing the draw.
    pub fn requote<R: Rng>(&mut self, params: &MarketParams, rng: &mut R) {
        let candidate = rng.gen_range(params.min_price..params.max_price);
        self.price = params.clamp_price(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SEED: u64 = 42;

    fn params() -> MarketParams {
        MarketParams::new(10.0, 100.0, 0.1)
    }

    #[test]
    fn random_agents_start_within_ranges() {
        let mut rng = StdRng::seed_from_u64(SEED);
        for _ in 0..100 {
            let buyer = Buyer::random(&mut rng);
            assert!(buyer.cash >= INITIAL_CASH_RANGE.0 && buyer.cash < INITIAL_CASH_RANGE.1);
            assert!(
                buyer.demand >= INITIAL_DEMAND_RANGE.0 && buyer.demand < INITIAL_DEMAND_RANGE.1
            );

            let seller = Seller::random(&params(), &mut rng);
            assert!(seller.price >= 10.0 && seller.price <= 100.0);
        }
    }

    #[test]
    fn buy_rejects_when_buyer_cannot_afford() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut buyer = Buyer::new(0.0, 3.0);
        let mut seller = Seller::new(150.0, 50.0);

        for _ in 0..50 {
            let executed = buyer.buy(&mut seller, &params(), TradeProtocol::DemandTracking, &mut rng);
            assert!(!executed);
        }
        assert_eq!(buyer.cash, 0.0);
        assert_eq!(buyer.demand, 3.0);
        assert_eq!(seller.cash, 150.0);
    }

    #[test]
    fn buy_rejects_when_quote_exceeds_willingness() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut buyer = Buyer::new(1000.0, 3.0);
        // Quote above max_price: no willingness draw can reach it
        let mut seller = Seller::new(150.0, 500.0);

        for _ in 0..50 {
            assert!(!buyer.buy(&mut seller, &params(), TradeProtocol::DemandTracking, &mut rng));
        }
        assert_eq!(buyer.cash, 1000.0);
    }

    #[test]
    fn buy_transfers_at_willingness_price() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut buyer = Buyer::new(1000.0, 3.0);
        // Quote at the floor: every willingness draw accepts it
        let mut seller = Seller::new(150.0, 10.0);

        let executed = buyer.buy(&mut seller, &params(), TradeProtocol::DemandTracking, &mut rng);
        assert!(executed);

        let paid = 1000.0 - buyer.cash;
        assert!(paid >= 10.0 && paid < 100.0, "paid {paid} outside range");
        approx::assert_relative_eq!(seller.cash, 150.0 + paid);
        approx::assert_relative_eq!(buyer.demand, 2.0);
    }

    #[test]
    fn price_only_protocol_leaves_demand_untouched() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut buyer = Buyer::new(1000.0, 3.0);
        let mut seller = Seller::new(150.0, 10.0);

        assert!(buyer.buy(&mut seller, &params(), TradeProtocol::PriceOnly, &mut rng));
        assert_eq!(buyer.demand, 3.0);
    }

    #[test]
    fn demand_floors_at_zero() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut buyer = Buyer::new(10_000.0, 0.5);
        let mut seller = Seller::new(150.0, 10.0);

        assert!(buyer.buy(&mut seller, &params(), TradeProtocol::DemandTracking, &mut rng));
        assert_eq!(buyer.demand, 0.0);
    }

    #[test]
    fn sell_executes_at_quoted_price() {
        let mut buyer = Buyer::new(120.0, 2.0);
        let mut seller = Seller::new(150.0, 40.0);

        assert!(seller.sell(&mut buyer));
        approx::assert_relative_eq!(buyer.cash, 80.0);
        approx::assert_relative_eq!(buyer.demand, 1.0);
        approx::assert_relative_eq!(seller.cash, 190.0);
    }

    #[test]
    fn sell_rejects_exhausted_or_broke_buyers() {
        let mut seller = Seller::new(150.0, 40.0);

        let mut exhausted = Buyer::new(120.0, 0.5);
        assert!(!seller.sell(&mut exhausted));

        let mut broke = Buyer::new(30.0, 2.0);
        assert!(!seller.sell(&mut broke));

        assert_eq!(seller.cash, 150.0);
    }

    #[test]
    fn requote_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let params = params();
        let mut seller = Seller::new(150.0, 500.0);

        for _ in 0..100 {
            seller.requote(&params, &mut rng);
            assert!(seller.price >= params.min_price && seller.price <= params.max_price);
        }
    }
}
