use anyhow::Context;
use augur::types::{CandleWindow, MarketContext};
use augur::{Config, SignalPipeline};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let candles_path = args
        .next()
        .context("usage: augur <candles.json> [market_context.json]")?;
    let context_path = args.next();

    // Load configuration
    let config = Config::from_env();
    config.validate()?;
    info!(
        "Starting Augur: model v{} from {}, min confidence {}",
        config.model.version,
        config.model.path.display(),
        config.min_confidence
    );

    let raw = tokio::fs::read_to_string(&candles_path)
        .await
        .with_context(|| format!("reading {}", candles_path))?;
    let window = CandleWindow::from_json(&raw)
        .with_context(|| format!("parsing candles from {}", candles_path))?;

    let context = match context_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path))?;
            Some(
                serde_json::from_str::<MarketContext>(&raw)
                    .with_context(|| format!("parsing market context from {}", path))?,
            )
        }
        None => None,
    };

    info!(
        "Loaded {} {} candles for {}",
        window.len(),
        window.timeframe(),
        window.symbol()
    );

    let pipeline = Arc::new(SignalPipeline::from_config(&config));
    match pipeline.evaluate_async(window, context).await {
        Some(signal) => println!("{}", serde_json::to_string_pretty(&signal)?),
        None => info!("No signal"),
    }

    Ok(())
}
