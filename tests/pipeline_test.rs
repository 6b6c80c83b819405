//! End-to-end pipeline behaviour.

mod common;

use augur::config::ModelConfig;
use augur::services::signals::gate::percentages;
use augur::services::signals::{
    AdxMode, EntryContext, FeatureEncoder, LinearClassifier, ModelBundle, NoModelSource,
    PredictionGate, RiskLevelCalculator, SignalPredictor,
};
use augur::types::{
    Attribution, Candle, CandleWindow, Direction, MarketContext, MarketRegime, Prediction, Priority,
    FEATURE_CATALOG, FEATURE_COUNT,
};
use augur::{Config, SignalPipeline};
use common::*;
use proptest::prelude::*;
use std::sync::Arc;

fn config() -> Config {
    Config {
        model: ModelConfig::default(),
        min_confidence: 70.0,
        min_candles: 50,
        max_history: 500,
        horizon_hours: 24,
        position_size_pct: 5.0,
        adx_mode: AdxMode::Disabled,
    }
}

fn rules_pipeline() -> SignalPipeline {
    SignalPipeline::new(&config(), Arc::new(NoModelSource))
}

fn long_pipeline() -> Arc<SignalPipeline> {
    let predictor = SignalPredictor::with_bundle(ModelBundle {
        version: "1.0".to_string(),
        classifier: Arc::new(LinearClassifier {
            classes: vec![-1, 0, 1],
            coefficients: vec![vec![0.0; FEATURE_COUNT]; 3],
            intercepts: vec![0.0, 0.0, 5.0],
        }),
        scaler: None,
    });
    Arc::new(SignalPipeline::with_predictor(&config(), predictor))
}

#[test]
fn test_flat_window_is_quiet() {
    let window = flat_window(60, 100.0, 10.0);
    let pipeline = rules_pipeline();

    let snapshot = pipeline.indicators(&window);
    assert_eq!(snapshot.rsi_14, Some(50.0));
    assert_eq!(snapshot.rsi_7, Some(50.0));
    assert_eq!(snapshot.atr, Some(0.0));
    assert_eq!(snapshot.bb_width, Some(0.0));
    assert_eq!(snapshot.volume_ratio, Some(100.0));
    assert_eq!(snapshot.stoch_k, None);
    assert_eq!(snapshot.cci, None);
    assert_eq!(snapshot.willr, None);

    assert!(pipeline.evaluate(&window, None).is_none());
}

#[test]
fn test_flat_window_with_confident_model_has_no_levels() {
    let window = flat_window(60, 100.0, 10.0);
    let signal = long_pipeline().evaluate(&window, None).unwrap();
    assert_eq!(signal.stop_loss, None);
    assert_eq!(signal.take_profit, None);
    assert_eq!(signal.risk_reward, None);
}

#[test]
fn test_below_min_candles() {
    let window = uptrend_window(49);
    assert!(long_pipeline().evaluate(&window, None).is_none());
    assert!(long_pipeline().evaluate(&uptrend_window(50), None).is_some());
}

#[test]
fn test_gate_discards_low_confidence() {
    let prediction = Prediction {
        direction: Direction::Long,
        confidence: 65.0,
        score: Some(1),
        attribution: Attribution::Rules(vec!["MACD bullish".to_string()]),
        model_version: "rules-based".to_string(),
        model_type: "rules".to_string(),
    };
    let window = uptrend_window(60);
    let entry = EntryContext::from_candle(window.last());
    assert!(PredictionGate::default()
        .evaluate(prediction, &entry, None)
        .is_none());
}

proptest! {
    /// Stops and targets bracket the entry at a 1.5 reward-to-risk ratio.
    #[test]
    fn risk_level_invariants(
        entry in (100.0..50_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        atr in 1.0..500.0_f64,
    ) {
        let calc = RiskLevelCalculator::default();

        let long = calc.levels(Some(entry), Direction::Long, Some(atr));
        if let Some(long) = long {
            prop_assert!(long.stop_loss > 0.0);
            prop_assert!(long.stop_loss < entry && entry < long.take_profit);
            let (_, _, rr) = percentages(Direction::Long, entry, Some(long));
            prop_assert!((rr.unwrap() - 1.5).abs() < 0.01);
        } else {
            prop_assert!(entry - atr * 1.5 < 0.01);
        }

        if let Some(short) = calc.levels(Some(entry), Direction::Short, Some(atr)) {
            prop_assert!(short.take_profit > 0.0);
            prop_assert!(short.take_profit < entry && entry < short.stop_loss);
            let (_, _, rr) = percentages(Direction::Short, entry, Some(short));
            prop_assert!((rr.unwrap() - 1.5).abs() < 0.01);
        }
    }
}

#[test]
fn test_expiry_overflow_discards_signal() {
    let start = i64::MAX - 100 * HOUR_MS;
    let candles: Vec<Candle> = (0..80)
        .map(|i| {
            let open_time = start + i as i64 * HOUR_MS;
            let base = 100.0 + i as f64 * 1.5;
            Candle::new(
                "BTCUSDT",
                "1h",
                open_time,
                base,
                base + 2.0,
                base - 1.0,
                base + 1.0,
                1000.0,
                open_time + HOUR_MS - 1,
            )
        })
        .collect();
    let earlier = CandleWindow::new(candles[..60].to_vec()).unwrap();
    let window = CandleWindow::new(candles).unwrap();

    assert!(long_pipeline().evaluate(&window, None).is_none());
    assert!(long_pipeline().evaluate(&earlier, None).is_some());
}

#[test]
fn test_feature_order_and_default_context() {
    let window = CandleWindow::new(random_walk(21, 120)).unwrap();
    let snapshot = rules_pipeline().indicators(&window);

    let first = FeatureEncoder.encode(&window, &snapshot, None);
    let second = FeatureEncoder.encode(&window, &snapshot, None);
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|(name, _)| name).collect();
    assert_eq!(names, FEATURE_CATALOG.to_vec());
    assert_eq!(first.values()[19..], [50.0, 50.0, 0.0]);

    let context = MarketContext {
        btc_dominance: Some(48.0),
        fear_greed_index: Some(22.0),
        market_regime: MarketRegime::Bull,
    };
    let with_context = FeatureEncoder.encode(&window, &snapshot, Some(&context));
    assert_eq!(with_context.values()[19..], [48.0, 22.0, 1.0]);
}

#[test]
fn test_signal_fields() {
    let window = uptrend_window(80);
    let signal = long_pipeline().evaluate(&window, None).unwrap();

    assert_eq!(signal.direction, Direction::Long);
    assert_eq!(signal.priority, Priority::Critical);
    assert_eq!(signal.time_horizon_hours, 24);
    assert_eq!(signal.expires_at, signal.prediction_time + 24 * HOUR_MS);
    assert_eq!(signal.position_size_pct, 5.0);
    assert_approx(signal.risk_reward.unwrap(), 1.5, 1e-9);

    let json = serde_json::to_value(&signal).unwrap();
    assert_eq!(json["direction"], "LONG");
    assert_eq!(json["priority"], "CRITICAL");
    assert_eq!(json["attribution"]["kind"], "features");
    assert!(json["stopLossPct"].is_number());
}

#[tokio::test]
async fn test_evaluate_async() {
    let pipeline = long_pipeline();
    let signal = pipeline.evaluate_async(uptrend_window(60), None).await;
    assert!(signal.is_some());
}

#[test]
fn test_evaluate_async_rules_path() {
    let pipeline = Arc::new(rules_pipeline());
    let signal = tokio_test::block_on(async {
        pipeline
            .evaluate_async(flat_window(60, 100.0, 10.0), None)
            .await
    });
    assert!(signal.is_none());
}
