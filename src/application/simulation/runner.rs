//! Simulation Runner
//!
//! The stepper that advances the market model one discrete unit at a time.
//! Steps are non-overlapping and never long-running; "running" mode is a
//! cooperative re-scheduling loop, not a blocking one, so a stop request
//! takes effect before the next step is enqueued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::{MarketModel, MarketParams, TradeProtocol, ValidationError};

/// Configuration for the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Initial number of buyers
    pub buyer_count: usize,
    /// Initial number of sellers
    pub seller_count: usize,
    /// Global market parameters
    pub params: MarketParams,
    /// Trade protocol applied to every buy
    pub protocol: TradeProtocol,
    /// Simulated time advanced per step (hours)
    pub time_step_hours: u64,
    /// A shock trial runs whenever simulated time is a multiple of this (hours)
    pub shock_interval_hours: u64,
    /// Delay between scheduled steps while running (milliseconds)
    pub step_delay_ms: u64,
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            buyer_count: 100,
            seller_count: 100,
            params: MarketParams::default(),
            protocol: TradeProtocol::default(),
            time_step_hours: 1,
            shock_interval_hours: 10,
            step_delay_ms: 500,
            seed: None,
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSample {
    /// Step number (0-based)
    pub step: u64,
    /// Simulated time after this step (hours)
    pub sim_time_hours: u64,
    /// Quoted price of the selected seller
    pub price: f64,
    /// Active seller count
    pub supply_count: usize,
    /// Total remaining buyer demand
    pub demand_count: f64,
}

/// The three parallel output series, one entry per step
///
/// Append-only; cleared together only on re-initialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSeries {
    pub prices: Vec<f64>,
    pub supply: Vec<usize>,
    pub demand: Vec<f64>,
}

impl MarketSeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn push(&mut self, sample: &StepSample) {
        self.prices.push(sample.price);
        self.supply.push(sample.supply_count);
        self.demand.push(sample.demand_count);
    }

    fn clear(&mut self) {
        self.prices.clear();
        self.supply.clear();
        self.demand.clear();
    }
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Steps executed since the last initialization
    pub total_steps: u64,
    /// Trades that actually executed (rejections are silent)
    pub trades_executed: u64,
    /// Shock trials that fired and re-randomized seller quotes
    pub shocks_applied: u64,
}

/// Scheduling state of the stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Stopped,
    Running,
}

/// Clonable handle for the display layer
///
/// Carries the shared stop flag and a read-only view of the output series,
/// so charts can snapshot while the run loop owns the runner.
#[derive(Clone)]
pub struct SimulationHandle {
    running: Arc<AtomicBool>,
    series: Arc<RwLock<MarketSeries>>,
}

impl SimulationHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request a stop; the in-flight step completes, the next is not scheduled
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Snapshot of the output series
    pub fn snapshot(&self) -> MarketSeries {
        self.series.read().clone()
    }
}

/// The simulation runner advances the market model step by step
pub struct SimulationRunner {
    config: SimulationConfig,
    model: MarketModel,
    rng: StdRng,
    sim_time_hours: u64,
    step_count: u64,
    series: Arc<RwLock<MarketSeries>>,
    running: Arc<AtomicBool>,
    metrics: SimulationMetrics,
}

impl SimulationRunner {
    /// Create a runner with a freshly populated market
    pub fn new(config: SimulationConfig) -> Result<Self, ValidationError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let model = MarketModel::new(
            config.buyer_count,
            config.seller_count,
            config.params,
            config.protocol,
            &mut rng,
        )?;

        Ok(Self {
            config,
            model,
            rng,
            sim_time_hours: 0,
            step_count: 0,
            series: Arc::new(RwLock::new(MarketSeries::default())),
            running: Arc::new(AtomicBool::new(false)),
            metrics: SimulationMetrics::default(),
        })
    }

    /// Repopulate the market and reset the run
    ///
    /// Replaces both agent collections atomically, clears all three series
    /// together, and rewinds simulated time and metrics.
    pub fn initialize(&mut self, buyer_count: usize, seller_count: usize) {
        self.model.initialize(buyer_count, seller_count, &mut self.rng);
        self.series.write().clear();
        self.sim_time_hours = 0;
        self.step_count = 0;
        self.metrics = SimulationMetrics::default();
        log::info!("market initialized: {buyer_count} buyers, {seller_count} sellers");
    }

    /// Replace the market parameters; prior state untouched on rejection
    pub fn reconfigure(&mut self, params: MarketParams) -> Result<(), ValidationError> {
        self.model.reconfigure(params)?;
        log::info!(
            "parameters updated: price range [{}, {}], shock probability {}",
            params.min_price,
            params.max_price,
            params.shock_probability
        );
        Ok(())
    }

    /// Execute one simulation step synchronously
    ///
    /// Selects a buyer/seller pair, re-quotes the seller, runs the trade
    /// primitive, advances simulated time, runs the interval-gated shock
    /// trial, and appends the resulting observation to the series. A step
    /// over an empty population skips the trade and repeats the last
    /// observed price rather than failing.
    pub fn step(&mut self) -> StepSample {
        let (buyer_count, seller_count) = self.model.counts();
        let pair = if buyer_count > 0 && seller_count > 0 {
            let buyer_idx = self.rng.gen_range(0..buyer_count);
            let seller_idx = self.rng.gen_range(0..seller_count);
            Some((buyer_idx, seller_idx))
        } else {
            None
        };

        if let Some((buyer_idx, seller_idx)) = pair {
            if self.model.trade(buyer_idx, seller_idx, &mut self.rng) {
                self.metrics.trades_executed += 1;
            }
        }

        self.sim_time_hours += self.config.time_step_hours;

        if self.config.shock_interval_hours > 0
            && self.sim_time_hours % self.config.shock_interval_hours == 0
            && self.model.apply_external_shock(&mut self.rng)
        {
            self.metrics.shocks_applied += 1;
            log::info!("external shock at t={}h: all quotes re-drawn", self.sim_time_hours);
        }

        // The recorded price is the selected seller's quote after any shock
        let price = match pair {
            Some((_, seller_idx)) => self.model.sellers()[seller_idx].price,
            None => self
                .series
                .read()
                .prices
                .last()
                .copied()
                .unwrap_or(self.model.params().min_price),
        };

        let stats = self.model.aggregate_statistics();
        let sample = StepSample {
            step: self.step_count,
            sim_time_hours: self.sim_time_hours,
            price,
            supply_count: stats.supply_count,
            demand_count: stats.demand_count,
        };
        self.series.write().push(&sample);

        self.step_count += 1;
        self.metrics.total_steps += 1;

        log::debug!(
            "step {}: price={:.2}, supply={}, demand={:.1}",
            sample.step,
            sample.price,
            sample.supply_count,
            sample.demand_count
        );

        sample
    }

    /// Execute a fixed batch of steps synchronously
    pub fn run_steps(&mut self, count: u64) -> Vec<StepSample> {
        (0..count).map(|_| self.step()).collect()
    }

    /// Run cooperatively until stopped
    ///
    /// Each iteration completes a full step, then sleeps for the configured
    /// delay before scheduling the next. A `stop` (on the runner or a
    /// handle) prevents the next iteration; it never preempts a step.
    pub async fn run(&mut self) {
        self.start();
        while self.running.load(Ordering::SeqCst) {
            self.step();
            tokio::time::sleep(Duration::from_millis(self.config.step_delay_ms)).await;
        }
        log::info!("simulation stopped after {} steps", self.step_count);
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        log::info!("simulation running");
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    /// Snapshot of the output series
    pub fn get_series(&self) -> MarketSeries {
        self.series.read().clone()
    }

    /// Current (buyer_count, seller_count)
    pub fn counts(&self) -> (usize, usize) {
        self.model.counts()
    }

    pub fn metrics(&self) -> SimulationMetrics {
        self.metrics
    }

    pub fn params(&self) -> &MarketParams {
        self.model.params()
    }

    pub fn model(&self) -> &MarketModel {
        &self.model
    }

    /// Handle for the display layer (stop flag + series snapshots)
    pub fn handle(&self) -> SimulationHandle {
        SimulationHandle {
            running: Arc::clone(&self.running),
            series: Arc::clone(&self.series),
        }
    }
}
