use picker_core::{Advice, EntryPlan, GttOrder, IndicatorSnapshot, RiskPolicy, TradeDecision};

use crate::normalize::{normalize, round_to, safe_ratio, step_positive};
use crate::strategy::ScoringStrategy;

/// Normalized sub-scores, each in [0, 1], computed before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub trend_strength: f64,
    pub ema_alignment: f64,
    pub macd_trend: f64,
    pub rsi: f64,
    pub stochastic: f64,
    pub willr: f64,
    pub momentum: f64,
    pub awesome_oscillator: f64,
    pub vwma: f64,
    pub performance: f64,
}

impl SubScores {
    pub fn as_array(&self) -> [f64; 10] {
        [
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
        ]
    }
}

/// Map one snapshot onto its normalized sub-scores.
///
/// ADX maps from [0, 50] (>25 trending), RSI from [30, 70], stochastic %K
/// from [20, 80]. Williams %R is inverted: a lower raw value means oversold,
/// so it scores higher. MACD, momentum, EMA alignment, and price-vs-VWMA are
/// directional {0, 1} flags; the EMA flag requires a strictly descending
/// ladder (ema5 > ema10 > ... > ema200). The performance term maps the
/// historical win ratio from [0.3, 0.8].
pub fn sub_scores(snapshot: &IndicatorSnapshot) -> SubScores {
    let emas = snapshot.emas();
    let ema_alignment = if emas.windows(2).all(|w| w[0] > w[1]) {
        1.0
    } else {
        0.0
    };

    let total_signals = snapshot.win_signals() + snapshot.loss_signals();
    let win_rate = safe_ratio(snapshot.win_signals(), total_signals);

    SubScores {
        trend_strength: normalize(snapshot.adx(), 0.0, 50.0),
        ema_alignment,
        macd_trend: step_positive(snapshot.macd()),
        rsi: normalize(snapshot.rsi(), 30.0, 70.0),
        stochastic: normalize(snapshot.stochastic_k(), 20.0, 80.0),
        willr: 1.0 - normalize(-snapshot.will_r(), 20.0, 80.0),
        momentum: step_positive(snapshot.momentum()),
        awesome_oscillator: normalize(snapshot.awesome_oscillator(), -50.0, 50.0),
        vwma: if snapshot.close() >= snapshot.vwma() {
            1.0
        } else {
            0.0
        },
        performance: normalize(win_rate, 0.3, 0.8),
    }
}

/// Turn one snapshot into a trade decision. Pure and deterministic: no I/O,
/// no clock, no randomness. Identical inputs always produce an identical
/// decision. Sparse snapshots score degenerately instead of failing.
pub fn score(
    snapshot: &IndicatorSnapshot,
    policy: &RiskPolicy,
    capital: f64,
    strategy: &ScoringStrategy,
) -> TradeDecision {
    let subs = sub_scores(snapshot);
    let composite = round_to(strategy.weights.blend(&subs), 4);
    let advice = Advice::from_score(composite);
    let enter = composite >= strategy.entry_threshold;

    let params =
        serde_json::to_string(snapshot).unwrap_or_else(|_| String::from("{}"));

    if !enter {
        return TradeDecision {
            segment: snapshot.segment.clone(),
            symbol: snapshot.symbol.clone(),
            score: composite,
            enter: false,
            plan: None,
            reason: Some(advice.reason().to_string()),
            params,
        };
    }

    let buy_price = snapshot.close();
    let stop_percent = strategy.stop_loss_percent(policy);
    let stop_loss_price = buy_price * (1.0 - stop_percent / 100.0);
    let target_price = buy_price * (1.0 + strategy.target_gain_percent / 100.0);

    // Position sizing against the unrounded prices: shares such that a stop
    // hit loses at most per_trade_loss_percent of capital.
    let max_per_trade_risk = capital * policy.per_trade_loss_percent / 100.0;
    let risk_per_share = buy_price - stop_loss_price;
    let max_shares = if risk_per_share > 0.0 {
        (max_per_trade_risk / risk_per_share).floor() as u64
    } else {
        // Zero risk-per-share cannot be sized meaningfully; the decision
        // stands but with no buyable quantity.
        tracing::debug!(
            "degenerate risk-per-share for {}:{}, sizing to 0 shares",
            snapshot.segment,
            snapshot.symbol
        );
        0
    };

    let stop_loss_price = round_to(stop_loss_price, 2);
    let target_price = round_to(target_price, 2);

    TradeDecision {
        segment: snapshot.segment.clone(),
        symbol: snapshot.symbol.clone(),
        score: composite,
        enter: true,
        plan: Some(EntryPlan {
            buy_price: round_to(buy_price, 2),
            stop_loss_price,
            target_price,
            gtt: GttOrder {
                stop_loss_trigger: stop_loss_price,
                target_trigger: target_price,
            },
            max_shares,
        }),
        reason: None,
        params,
    }
}
