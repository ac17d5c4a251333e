use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// A `"SEGMENT:SYMBOL"` identifier, e.g. `"NSE:RELIANCE"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId {
    pub segment: String,
    pub symbol: String,
}

impl FromStr for SymbolId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (segment, symbol) = s.split_once(':').ok_or_else(|| {
            FetchError::MalformedSnapshot(format!("missing ':' in symbol id {s:?}"))
        })?;
        if segment.is_empty() || symbol.is_empty() {
            return Err(FetchError::MalformedSnapshot(format!(
                "empty segment or symbol in {s:?}"
            )));
        }
        Ok(Self {
            segment: segment.to_string(),
            symbol: symbol.to_string(),
        })
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.segment, self.symbol)
    }
}

/// One symbol's technical indicators at fetch time. Immutable once fetched.
///
/// Every indicator is optional on the wire; the accessor methods apply the
/// documented neutral defaults (0.0 everywhere, -100.0 for Williams %R) so a
/// sparse payload scores degenerately instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Stamped from the requested id; the analytics endpoint omits identity.
    #[serde(default)]
    pub segment: String,
    #[serde(default)]
    pub symbol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(rename = "willR", default, skip_serializing_if = "Option::is_none")]
    pub will_r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stochastic_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awesome_oscillator: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema100: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema200: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_signals: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_signals: Option<f64>,

    /// Indicator fields we don't score, kept so the persisted raw params
    /// round-trip the full endpoint payload.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl IndicatorSnapshot {
    pub fn adx(&self) -> f64 {
        self.adx.unwrap_or(0.0)
    }

    pub fn macd(&self) -> f64 {
        self.macd.unwrap_or(0.0)
    }

    pub fn rsi(&self) -> f64 {
        self.rsi.unwrap_or(0.0)
    }

    /// Williams %R lives in [-100, 0]; a missing value defaults to the
    /// deep-oversold end rather than 0 (which would read as overbought).
    pub fn will_r(&self) -> f64 {
        self.will_r.unwrap_or(-100.0)
    }

    pub fn stochastic_k(&self) -> f64 {
        self.stochastic_k.unwrap_or(0.0)
    }

    pub fn awesome_oscillator(&self) -> f64 {
        self.awesome_oscillator.unwrap_or(0.0)
    }

    pub fn momentum(&self) -> f64 {
        self.momentum.unwrap_or(0.0)
    }

    /// EMA ladder ordered shortest lookback first.
    pub fn emas(&self) -> [f64; 6] {
        [
            self.ema5.unwrap_or(0.0),
            self.ema10.unwrap_or(0.0),
            self.ema20.unwrap_or(0.0),
            self.ema50.unwrap_or(0.0),
            self.ema100.unwrap_or(0.0),
            self.ema200.unwrap_or(0.0),
        ]
    }

    pub fn vwma(&self) -> f64 {
        self.vwma.unwrap_or(0.0)
    }

    pub fn close(&self) -> f64 {
        self.close.unwrap_or(0.0)
    }

    pub fn win_signals(&self) -> f64 {
        self.win_signals.unwrap_or(0.0)
    }

    pub fn loss_signals(&self) -> f64 {
        self.loss_signals.unwrap_or(0.0)
    }
}

/// Risk configuration, loaded once per run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    pub max_drawdown_percent: f64,
    pub per_trade_loss_percent: f64,
    pub daily_stop_loss_percent: f64,
    pub monthly_loss_percent: f64,
    pub trading_horizon_days: u32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            max_drawdown_percent: 5.0,
            per_trade_loss_percent: 1.0,
            daily_stop_loss_percent: 2.0,
            monthly_loss_percent: 4.0,
            trading_horizon_days: 14,
        }
    }
}

/// Good-till-triggered order pair for a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GttOrder {
    pub stop_loss_trigger: f64,
    pub target_trigger: f64,
}

/// Prices and sizing for an entry-eligible decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPlan {
    pub buy_price: f64,
    pub stop_loss_price: f64,
    pub target_price: f64,
    pub gtt: GttOrder,
    /// Maximum shares under the per-trade risk budget. 0 when the
    /// risk-per-share is degenerate (zero): sized out, never an error.
    pub max_shares: u64,
}

/// Advisory classification of a composite score. Narrative only; the
/// binding entry decision uses a separate threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advice {
    Buy,
    Hold,
    Sell,
}

impl Advice {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.70 {
            Advice::Buy
        } else if score >= 0.45 {
            Advice::Hold
        } else {
            Advice::Sell
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Advice::Buy => "BUY",
            Advice::Hold => "HOLD",
            Advice::Sell => "SELL",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Advice::Buy => "Strong trend and positive momentum",
            Advice::Hold => "Moderate momentum, trend still intact",
            Advice::Sell => "Weakening trend or momentum signals",
        }
    }
}

/// One scored recommendation. Created once per snapshot, never mutated,
/// lifetime ends at persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub segment: String,
    pub symbol: String,
    /// Weighted composite score in [0, 1], rounded to 4 decimal places.
    pub score: f64,
    pub enter: bool,
    /// Present iff `enter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<EntryPlan>,
    /// Present iff not entering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Serialized raw snapshot, persisted alongside the decision.
    pub params: String,
}

impl TradeDecision {
    pub fn buy_price(&self) -> Option<f64> {
        self.plan.as_ref().map(|p| p.buy_price)
    }
}

/// Which write semantics a persist call should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkMode {
    Overwrite,
    Append,
    Read,
}

/// What a persist call actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistOutcome {
    /// Append silently resolves to Overwrite on an empty or header-only
    /// store; this reports the mode that was applied.
    pub mode_applied: SinkMode,
    pub rows_written: usize,
    /// Populated in Read mode only: the persisted rows, header excluded.
    pub rows: Option<Vec<Vec<String>>>,
}

/// User-visible totals for one run, with no partial-success ambiguity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub symbols_attempted: usize,
    pub snapshots_scored: usize,
    pub decisions_persisted: usize,
}
