//! Console demo: run the market for a batch of steps and print a summary

use market_abm::{MarketParams, SimulationConfig, SimulationRunner, TradeProtocol};

fn main() {
    env_logger::init();

    println!("=== Market ABM Demo ===\n");

    let config = SimulationConfig {
        buyer_count: 100,
        seller_count: 100,
        params: MarketParams::default(),
        protocol: TradeProtocol::DemandTracking,
        seed: Some(42),
        ..Default::default()
    };
    let params = config.params;

    let mut runner = match SimulationRunner::new(config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let (buyers, sellers) = runner.counts();
    println!("Market: {buyers} buyers, {sellers} sellers");
    println!(
        "Price range: [{}, {}], shock probability {}\n",
        params.min_price, params.max_price, params.shock_probability
    );

    println!("Running 100 steps...\n");
    for sample in runner.run_steps(100) {
        if (sample.step + 1) % 20 == 0 {
            println!(
                "  step {:>3}: price=${:>6.2}  supply={:>3}  demand={:>7.2}",
                sample.step + 1,
                sample.price,
                sample.supply_count,
                sample.demand_count
            );
        }
    }

    let metrics = runner.metrics();
    let series = runner.get_series();
    println!("\nSummary:");
    println!("  steps:           {}", metrics.total_steps);
    println!("  trades executed: {}", metrics.trades_executed);
    println!("  shocks applied:  {}", metrics.shocks_applied);
    if let Some(last) = series.prices.last() {
        println!("  closing price:   ${last:.2}");
    }
}
