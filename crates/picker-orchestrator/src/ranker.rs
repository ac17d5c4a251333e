//! Ordering of entry-eligible decisions.

use std::cmp::Ordering;

use picker_core::TradeDecision;

/// Keep only the `enter == true` decisions, ordered by composite score
/// descending, ties broken by buy price descending. The sort is stable, so
/// exact ties on both keys preserve their original relative order. Output
/// order is a pure function of the input collection and does not depend on
/// fetch completion order.
pub fn rank(decisions: Vec<TradeDecision>) -> Vec<TradeDecision> {
    let mut picks: Vec<TradeDecision> = decisions.into_iter().filter(|d| d.enter).collect();

    picks.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let a_buy = a.buy_price().unwrap_or(0.0);
                let b_buy = b.buy_price().unwrap_or(0.0);
                b_buy.partial_cmp(&a_buy).unwrap_or(Ordering::Equal)
            })
    });

    picks
}
