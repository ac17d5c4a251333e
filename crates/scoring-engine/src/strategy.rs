use anyhow::{bail, Result};
use picker_core::RiskPolicy;
use serde::{Deserialize, Serialize};

use crate::engine::SubScores;

/// Named weight per normalized sub-score. The table is a fixed,
/// externally-supplied policy; it is never derived or fitted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    // Trend strength (40%)
    pub trend_strength: f64,
    pub ema_alignment: f64,
    pub macd_trend: f64,
    // Momentum (35%)
    pub rsi: f64,
    pub stochastic: f64,
    pub willr: f64,
    pub momentum: f64,
    // Volume/confirmation (15%)
    pub awesome_oscillator: f64,
    pub vwma: f64,
    // Performance (10%)
    pub performance: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            trend_strength: 0.15,
            ema_alignment: 0.10,
            macd_trend: 0.15,
            rsi: 0.10,
            stochastic: 0.10,
            willr: 0.05,
            momentum: 0.10,
            awesome_oscillator: 0.10,
            vwma: 0.05,
            performance: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.trend_strength
            + self.ema_alignment
            + self.macd_trend
            + self.rsi
            + self.stochastic
            + self.willr
            + self.momentum
            + self.awesome_oscillator
            + self.vwma
            + self.performance
    }

    /// A usable table has non-negative weights summing to 1.0 (±1e-6).
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.trend_strength,
            self.ema_alignment,
            self.macd_trend,
            self.rsi,
            self.stochastic,
            self.willr,
            self.momentum,
            self.awesome_oscillator,
            self.vwma,
            self.performance,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            bail!("score weights must be non-negative");
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            bail!("score weights must sum to 1.0, got {sum}");
        }
        Ok(())
    }

    /// Weighted composite of the sub-scores, unrounded.
    pub fn blend(&self, s: &SubScores) -> f64 {
        s.trend_strength * self.trend_strength
            + s.ema_alignment * self.ema_alignment
            + s.macd_trend * self.macd_trend
            + s.rsi * self.rsi
            + s.stochastic * self.stochastic
            + s.willr * self.willr
            + s.momentum * self.momentum
            + s.awesome_oscillator * self.awesome_oscillator
            + s.vwma * self.vwma
            + s.performance * self.performance
    }
}

/// Where the stop-loss distance comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StopLossRule {
    /// The risk policy's daily stop-loss percentage (canonical).
    PolicyDaily,
    /// A fixed percentage below the buy price, regardless of policy.
    FixedPercent(f64),
}

/// Everything that parameterizes one scoring pass: the weight table, the
/// entry threshold, the profit target, and the stop-loss source. Swapping
/// strategies never touches the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringStrategy {
    pub weights: ScoreWeights,
    pub entry_threshold: f64,
    pub target_gain_percent: f64,
    pub stop_loss: StopLossRule,
}

impl Default for ScoringStrategy {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            entry_threshold: 0.6,
            target_gain_percent: 4.0,
            stop_loss: StopLossRule::PolicyDaily,
        }
    }
}

impl ScoringStrategy {
    /// Alternate configuration retained from an earlier scorer variant: the
    /// same blend, but a hard-coded 2% stop instead of the policy's daily
    /// stop-loss percentage.
    pub fn fixed_stop() -> Self {
        Self {
            stop_loss: StopLossRule::FixedPercent(2.0),
            ..Self::default()
        }
    }

    pub fn stop_loss_percent(&self, policy: &RiskPolicy) -> f64 {
        match self.stop_loss {
            StopLossRule::PolicyDaily => policy.daily_stop_loss_percent,
            StopLossRule::FixedPercent(percent) => percent,
        }
    }
}
