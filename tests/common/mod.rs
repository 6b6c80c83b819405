//! Shared candle builders for integration tests.

#![allow(dead_code)]

use augur::types::{Candle, CandleWindow};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

pub const START_MS: i64 = 1_700_000_000_000;
pub const HOUR_MS: i64 = 3_600_000;

pub fn candle(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    let open_time = START_MS + i as i64 * HOUR_MS;
    let close_time = open_time + HOUR_MS - 1;
    Candle::new("BTCUSDT", "1h", open_time, open, high, low, close, volume, close_time)
}

pub fn flat_window(count: usize, price: f64, volume: f64) -> CandleWindow {
    CandleWindow::new(
        (0..count)
            .map(|i| candle(i, price, price, price, price, volume))
            .collect(),
    )
    .unwrap()
}

pub fn uptrend_window(count: usize) -> CandleWindow {
    CandleWindow::new(
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                candle(i, base, base + 2.0, base - 1.0, base + 1.0, 1000.0)
            })
            .collect(),
    )
    .unwrap()
}

/// One candle's move: close return, upper wick, lower wick, volume.
pub type Step = (f64, f64, f64, f64);

/// Geometric walk from `start` with consistent OHLC.
pub fn walk(start: f64, steps: &[Step]) -> Vec<Candle> {
    let mut price = start;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(ret, upper, lower, volume))| {
            let open = price;
            let close = (open * (1.0 + ret)).max(1.0);
            let high = open.max(close) * (1.0 + upper);
            let low = open.min(close) * (1.0 - lower);
            price = close;
            candle(i, open, high, low, close, volume)
        })
        .collect()
}

/// Seeded random walk for fixed fixtures.
pub fn random_walk(seed: u64, count: usize) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let steps: Vec<Step> = (0..count)
        .map(|_| {
            (
                rng.gen_range(-0.03..0.03),
                rng.gen_range(0.0..0.01),
                rng.gen_range(0.0..0.01),
                rng.gen_range(0.0..5000.0),
            )
        })
        .collect();
    walk(100.0, &steps)
}

// ── Strategies (proptest) ────────────────────────────────────────────

pub fn arb_step() -> impl Strategy<Value = Step> {
    (-0.03..0.03_f64, 0.0..0.01_f64, 0.0..0.01_f64, 0.0..5000.0_f64)
}

pub fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Random walks with a length drawn from `len`.
pub fn arb_candles(len: RangeInclusive<usize>) -> impl Strategy<Value = Vec<Candle>> {
    (arb_price(), prop::collection::vec(arb_step(), len))
        .prop_map(|(start, steps)| walk(start, &steps))
}

pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, epsilon={epsilon}"
    );
}
