pub mod signals;

pub use signals::{
    FeatureEncoder, IndicatorEngine, PredictionGate, RiskLevelCalculator, SignalPipeline,
    SignalPredictor,
};
