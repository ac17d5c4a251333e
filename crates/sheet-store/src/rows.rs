//! Row layout shared by the worksheet store and the email attachment.

use picker_core::{SinkError, TradeDecision};

/// Column display order.
pub const HEADER: [&str; 12] = [
    "date_time",
    "weighted_score",
    "segment",
    "symbol",
    "buy_price",
    "max_shares",
    "stop_loss_price",
    "target_price",
    "gtt",
    "enter",
    "reason",
    "params",
];

/// Display-order cells for one decision. Price/size cells are empty for
/// no-entry decisions; the GTT pair is serialized as a JSON object cell.
pub fn decision_cells(decision: &TradeDecision, stamp: &str) -> Vec<String> {
    let (buy_price, max_shares, stop_loss_price, target_price, gtt) = match &decision.plan {
        Some(plan) => (
            format!("{:.2}", plan.buy_price),
            plan.max_shares.to_string(),
            format!("{:.2}", plan.stop_loss_price),
            format!("{:.2}", plan.target_price),
            serde_json::to_string(&plan.gtt).unwrap_or_else(|_| String::from("{}")),
        ),
        None => Default::default(),
    };

    vec![
        stamp.to_string(),
        decision.score.to_string(),
        decision.segment.clone(),
        decision.symbol.clone(),
        buy_price,
        max_shares,
        stop_loss_price,
        target_price,
        gtt,
        decision.enter.to_string(),
        decision.reason.clone().unwrap_or_default(),
        decision.params.clone(),
    ]
}

/// Render header + rows as CSV bytes.
pub fn render_csv(picks: &[TradeDecision], stamp: &str) -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .map_err(|e| SinkError::Csv(e.to_string()))?;
    for pick in picks {
        writer
            .write_record(decision_cells(pick, stamp))
            .map_err(|e| SinkError::Csv(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| SinkError::Csv(e.to_string()))
}
