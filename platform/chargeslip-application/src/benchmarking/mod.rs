use chargeslip_domain::services::charges::calculate;
use chargeslip_domain::value_objects::commodity::Commodity;
use chargeslip_domain::value_objects::instrument::InstrumentCategory;
use chargeslip_domain::value_objects::trade_input::TradeInput;
use chargeslip_domain::value_objects::venue::Venue;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchResult {
    pub iterations: usize,
    pub calls: u64,
    pub elapsed_ms: u128,
    pub calls_per_sec: f64,
    /// Sum of every computed total; keeps the work observable.
    pub checksum: f64,
}

/// Deterministic synthetic input for step `i`.
pub fn synthetic_input(i: usize) -> TradeInput {
    let base = 50.0 + (i % 997) as f64 * 0.25;
    let drift = ((i % 13) as f64 - 6.0) * 0.1;
    let commodity = Commodity::ALL[i % Commodity::ALL.len()];
    let venue = if i % 2 == 0 { Venue::Nse } else { Venue::Bse };
    TradeInput::new(base, base + drift, 1.0 + (i % 500) as f64)
        .with_venue(venue)
        .with_strike(base.round())
        .with_lot_multiplier(commodity.lot_multiplier())
}

/// Runs the engine `iterations` times for each category.
pub fn run_bench(iterations: usize) -> Result<BenchResult, String> {
    if iterations == 0 {
        return Err("iterations must be > 0".to_string());
    }

    let start = Instant::now();
    let mut calls = 0u64;
    let mut checksum = 0.0;
    for i in 0..iterations {
        let input = synthetic_input(i);
        for category in InstrumentCategory::ALL {
            checksum += calculate(category, &input).total;
            calls += 1;
        }
    }
    let elapsed = start.elapsed();
    let secs = elapsed.as_secs_f64();
    let calls_per_sec = if secs > 0.0 { calls as f64 / secs } else { 0.0 };

    tracing::info!(iterations, calls, elapsed_ms = elapsed.as_millis() as u64, "bench finished");
    Ok(BenchResult {
        iterations,
        calls,
        elapsed_ms: elapsed.as_millis(),
        calls_per_sec,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::{run_bench, synthetic_input};

    #[test]
    fn bench_counts_every_category() {
        let result = run_bench(10).expect("bench");
        assert_eq!(result.calls, 80);
        assert!(result.checksum > 0.0);
    }

    #[test]
    fn bench_rejects_zero_iterations() {
        assert!(run_bench(0).is_err());
    }

    #[test]
    fn synthetic_inputs_are_deterministic() {
        assert_eq!(synthetic_input(42), synthetic_input(42));
        assert!(synthetic_input(7).quantity >= 1.0);
    }
}
