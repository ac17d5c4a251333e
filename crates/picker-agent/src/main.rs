use std::sync::Arc;

use anyhow::{Context, Result};
use pick_notifier::{EmailNotifier, NotifierConfig};
use picker_core::PickNotifier;
use picker_orchestrator::PickRunner;
use sheet_store::CsvWorksheet;
use streak_client::StreakClient;

mod config;

use config::PickerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    tracing::info!("Starting Streak Picker");

    let config = PickerConfig::from_env()?;
    tracing::info!("Configuration loaded and validated");
    tracing::info!("  Capital: {}", config.capital);
    tracing::info!(
        "  Per-trade loss: {}%  Daily stop-loss: {}%",
        config.policy.per_trade_loss_percent,
        config.policy.daily_stop_loss_percent
    );
    tracing::info!(
        "  Worksheet: {}/{}.csv ({:?})",
        config.worksheet_dir.display(),
        config.worksheet_name,
        config.sink_mode
    );

    let client = Arc::new(StreakClient::new(
        config.analytics_url.clone(),
        config.screener_url.clone(),
    ));

    // Command-line symbols beat the configured set; an empty set falls back
    // to the screener universe.
    let mut symbols: Vec<String> = std::env::args().skip(1).collect();
    if symbols.is_empty() {
        symbols = config.symbols.clone();
    }
    if symbols.is_empty() {
        symbols = client
            .discover_symbols()
            .await
            .context("symbol universe discovery failed")?
            .into_iter()
            .collect();
    }

    let sheet = CsvWorksheet::new(&config.worksheet_dir, config.worksheet_name.clone());

    let notifier_config = NotifierConfig::from_env();
    let notifier = if notifier_config.is_configured() {
        match EmailNotifier::new(&notifier_config) {
            Ok(notifier) => {
                tracing::info!("Email delivery enabled");
                Some(notifier)
            }
            Err(e) => {
                tracing::warn!("Failed to initialize email notifier: {e}");
                None
            }
        }
    } else {
        tracing::info!("Email delivery not configured (set SMTP_HOST, SMTP_FROM_ADDRESS, PICKS_EMAIL_TO)");
        None
    };

    let runner = PickRunner::new(
        client,
        config.policy.clone(),
        config.strategy.clone(),
        config.capital,
    );

    let report = runner
        .run(
            symbols,
            config.sink_mode,
            &sheet,
            notifier.as_ref().map(|n| n as &dyn PickNotifier),
        )
        .await?;

    tracing::info!(
        "Run complete: {} symbols attempted, {} snapshots scored, {} decisions persisted",
        report.symbols_attempted,
        report.snapshots_scored,
        report.decisions_persisted
    );

    Ok(())
}
