#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use picker_core::{IndicatorSnapshot, RiskPolicy, TradeDecision};

    use crate::engine::{score, sub_scores};
    use crate::strategy::ScoringStrategy;

    const CAPITAL: f64 = 100_000.0;

    /// Strong-trend snapshot: adx 40, rsi 60, positive macd/momentum,
    /// strictly descending EMA ladder, close above vwma, 60% win rate.
    fn bullish_snapshot(close: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            segment: "NSE".to_string(),
            symbol: "TEST".to_string(),
            adx: Some(40.0),
            macd: Some(5.0),
            rsi: Some(60.0),
            momentum: Some(1.5),
            ema5: Some(105.0),
            ema10: Some(104.0),
            ema20: Some(103.0),
            ema50: Some(102.0),
            ema100: Some(101.0),
            ema200: Some(100.0),
            vwma: Some(close - 1.0),
            close: Some(close),
            win_signals: Some(60.0),
            loss_signals: Some(40.0),
            ..Default::default()
        }
    }

    fn default_score(snapshot: &IndicatorSnapshot) -> TradeDecision {
        score(
            snapshot,
            &RiskPolicy::default(),
            CAPITAL,
            &ScoringStrategy::default(),
        )
    }

    #[test]
    fn sub_scores_stay_in_unit_interval_for_extreme_inputs() {
        let extremes = [-1e9, -100.0, -1.0, 0.0, 0.5, 42.0, 100.0, 1e9];

        for &v in &extremes {
            let snapshot = IndicatorSnapshot {
                adx: Some(v),
                macd: Some(v),
                rsi: Some(v),
                will_r: Some(v),
                stochastic_k: Some(v),
                awesome_oscillator: Some(v),
                momentum: Some(v),
                ema5: Some(v),
                ema10: Some(v),
                ema20: Some(v),
                ema50: Some(v),
                ema100: Some(v),
                ema200: Some(v),
                vwma: Some(v),
                close: Some(v),
                win_signals: Some(v.abs()),
                loss_signals: Some(v.abs()),
                ..Default::default()
            };

            for s in sub_scores(&snapshot).as_array() {
                assert!((0.0..=1.0).contains(&s), "sub-score {s} out of range for input {v}");
            }
        }

        // Fully sparse payload must also stay in range.
        for s in sub_scores(&IndicatorSnapshot::default()).as_array() {
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn strong_trend_scores_above_buy_cut_and_enters() {
        let decision = default_score(&bullish_snapshot(100.0));

        // 0.12 trend + 0.10 ema + 0.15 macd + 0.075 rsi + 0.10 momentum
        // + 0.05 ao(neutral) + 0.05 vwma + 0.06 performance = 0.705
        assert_relative_eq!(decision.score, 0.705, epsilon = 1e-9);
        assert!(decision.score >= 0.70);
        assert!(decision.enter);
        assert!(decision.plan.is_some());
        assert!(decision.reason.is_none());
    }

    #[test]
    fn position_sizing_from_risk_budget() {
        // buy 100, stop 2% => 98.00, risk/share 2.00,
        // budget 1% of 100k => 1000, shares floor(1000/2) = 500.
        let decision = default_score(&bullish_snapshot(100.0));
        let plan = decision.plan.unwrap();

        assert_relative_eq!(plan.buy_price, 100.0);
        assert_relative_eq!(plan.stop_loss_price, 98.0);
        assert_relative_eq!(plan.target_price, 104.0);
        assert_relative_eq!(plan.gtt.stop_loss_trigger, 98.0);
        assert_relative_eq!(plan.gtt.target_trigger, 104.0);
        assert_eq!(plan.max_shares, 500);
        assert!(plan.stop_loss_price < plan.buy_price);
    }

    #[test]
    fn fixed_stop_strategy_overrides_policy_percent() {
        let mut policy = RiskPolicy::default();
        policy.daily_stop_loss_percent = 5.0;

        let strategy = ScoringStrategy::fixed_stop();
        let decision = score(&bullish_snapshot(100.0), &policy, CAPITAL, &strategy);
        let plan = decision.plan.unwrap();

        // 2% regardless of the policy's 5%.
        assert_relative_eq!(plan.stop_loss_price, 98.0);
    }

    #[test]
    fn zero_stop_percent_sizes_to_zero_shares() {
        let mut policy = RiskPolicy::default();
        policy.daily_stop_loss_percent = 0.0;

        let decision = score(
            &bullish_snapshot(100.0),
            &policy,
            CAPITAL,
            &ScoringStrategy::default(),
        );
        let plan = decision.plan.unwrap();

        assert!(decision.enter);
        assert_eq!(plan.max_shares, 0);
        assert_relative_eq!(plan.stop_loss_price, plan.buy_price);
    }

    #[test]
    fn weak_snapshot_carries_reason_and_no_plan() {
        let decision = default_score(&IndicatorSnapshot::default());

        assert!(!decision.enter);
        assert!(decision.plan.is_none());
        assert_eq!(
            decision.reason.as_deref(),
            Some("Weakening trend or momentum signals")
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let snapshot = bullish_snapshot(250.35);
        let a = default_score(&snapshot);
        let b = default_score(&snapshot);
        assert_eq!(a, b);
    }

    #[test]
    fn vwma_sub_score_monotone_in_close() {
        let mut snapshot = bullish_snapshot(100.0);
        snapshot.vwma = Some(100.0);

        snapshot.close = Some(100.0);
        let at_vwma = sub_scores(&snapshot).vwma;

        snapshot.close = Some(150.0);
        let above_vwma = sub_scores(&snapshot).vwma;

        assert!(above_vwma >= at_vwma);
        assert_eq!(at_vwma, 1.0);

        snapshot.close = Some(99.0);
        assert_eq!(sub_scores(&snapshot).vwma, 0.0);
    }

    #[test]
    fn broken_ema_ladder_zeroes_alignment() {
        let mut snapshot = bullish_snapshot(100.0);
        snapshot.ema50 = Some(104.5); // out of order
        assert_eq!(sub_scores(&snapshot).ema_alignment, 0.0);

        // Equal neighbours are not strictly descending either.
        let mut snapshot = bullish_snapshot(100.0);
        snapshot.ema10 = snapshot.ema5;
        assert_eq!(sub_scores(&snapshot).ema_alignment, 0.0);
    }

    #[test]
    fn params_round_trip_the_snapshot() {
        let snapshot = bullish_snapshot(100.0);
        let decision = default_score(&snapshot);

        let parsed: IndicatorSnapshot = serde_json::from_str(&decision.params).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
