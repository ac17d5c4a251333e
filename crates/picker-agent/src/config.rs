use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use picker_core::{RiskPolicy, SinkMode};
use scoring_engine::ScoringStrategy;
use streak_client::{DEFAULT_ANALYTICS_URL, DEFAULT_SCREENER_URL};

#[derive(Debug, Clone)]
pub struct PickerConfig {
    pub capital: f64,
    pub policy: RiskPolicy,
    pub strategy: ScoringStrategy,

    pub analytics_url: String,
    pub screener_url: String,

    pub worksheet_dir: PathBuf,
    pub worksheet_name: String,
    pub sink_mode: SinkMode,

    /// Explicit symbol set; empty means fall back to universe discovery.
    pub symbols: Vec<String>,
}

pub fn parse_sink_mode(value: &str) -> Result<SinkMode> {
    match value.to_ascii_lowercase().as_str() {
        "append" | "a" => Ok(SinkMode::Append),
        "overwrite" | "w" => Ok(SinkMode::Overwrite),
        other => bail!("unknown SINK_MODE {other:?} (expected append or overwrite)"),
    }
}

pub fn parse_strategy(value: &str) -> Result<ScoringStrategy> {
    match value.to_ascii_lowercase().as_str() {
        "default" | "policy" => Ok(ScoringStrategy::default()),
        "fixed-stop" => Ok(ScoringStrategy::fixed_stop()),
        other => bail!("unknown PICKER_STRATEGY {other:?} (expected default or fixed-stop)"),
    }
}

impl PickerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            capital: env::var("PORTFOLIO_CAPITAL")
                .unwrap_or_else(|_| "100000".to_string())
                .parse()
                .context("PORTFOLIO_CAPITAL must be numeric")?,

            policy: RiskPolicy {
                max_drawdown_percent: env::var("MAX_DRAWDOWN_PERCENT")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                per_trade_loss_percent: env::var("PER_TRADE_LOSS_PERCENT")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
                daily_stop_loss_percent: env::var("DAILY_STOP_LOSS_PERCENT")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
                monthly_loss_percent: env::var("MONTHLY_LOSS_PERCENT")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()?,
                trading_horizon_days: env::var("TRADING_HORIZON_DAYS")
                    .unwrap_or_else(|_| "14".to_string())
                    .parse()?,
            },

            strategy: parse_strategy(
                &env::var("PICKER_STRATEGY").unwrap_or_else(|_| "default".to_string()),
            )?,

            analytics_url: env::var("STREAK_ANALYTICS_URL")
                .unwrap_or_else(|_| DEFAULT_ANALYTICS_URL.to_string()),
            screener_url: env::var("STREAK_SCREENER_URL")
                .unwrap_or_else(|_| DEFAULT_SCREENER_URL.to_string()),

            worksheet_dir: env::var("WORKSHEET_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            worksheet_name: env::var("WORKSHEET").unwrap_or_else(|_| "Picks".to_string()),
            sink_mode: parse_sink_mode(
                &env::var("SINK_MODE").unwrap_or_else(|_| "append".to_string()),
            )?,

            symbols: env::var("PICKER_SYMBOLS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.capital <= 0.0 {
            bail!("PORTFOLIO_CAPITAL must be positive");
        }
        if self.policy.per_trade_loss_percent <= 0.0 {
            bail!("PER_TRADE_LOSS_PERCENT must be positive");
        }
        if self.policy.daily_stop_loss_percent < 0.0 {
            bail!("DAILY_STOP_LOSS_PERCENT must not be negative");
        }
        if self.policy.daily_stop_loss_percent >= 100.0 {
            bail!("DAILY_STOP_LOSS_PERCENT must be below 100");
        }
        self.strategy
            .weights
            .validate()
            .context("score weight table")?;
        Ok(())
    }
}
