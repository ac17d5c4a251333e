use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use picker_core::{PickNotifier, RiskPolicy, RunReport, SinkMode, TradeDecision, TradeSink};
use scoring_engine::{score, ScoringStrategy};
use streak_client::StreakClient;

pub mod fetch;
pub mod ranker;

#[cfg(test)]
pub(crate) mod testutil;

pub use fetch::{fetch_all, FetchOutcome};
pub use ranker::rank;

/// Format for the run stamp threaded through persistence and notification,
/// e.g. `Oct-02-2025 14:05`.
const RUN_STAMP_FORMAT: &str = "%b-%d-%Y %H:%M";

/// Drives one full batch: fan-out fetch, score, rank, persist, notify.
pub struct PickRunner {
    client: Arc<StreakClient>,
    policy: RiskPolicy,
    strategy: ScoringStrategy,
    capital: f64,
}

impl PickRunner {
    pub fn new(
        client: Arc<StreakClient>,
        policy: RiskPolicy,
        strategy: ScoringStrategy,
        capital: f64,
    ) -> Self {
        Self {
            client,
            policy,
            strategy,
            capital,
        }
    }

    /// Run one batch over `symbols`.
    ///
    /// The only suspension points are the network batch, the sink call, and
    /// the notifier; scoring and ranking are synchronous, so the persisted
    /// order never depends on fetch completion order. Fetch failures are
    /// logged and excluded from scoring; a persistence failure is fatal and
    /// surfaced unmodified; a notification failure is logged and swallowed.
    pub async fn run(
        &self,
        symbols: Vec<String>,
        mode: SinkMode,
        sink: &dyn TradeSink,
        notifier: Option<&dyn PickNotifier>,
    ) -> Result<RunReport> {
        self.strategy
            .weights
            .validate()
            .context("invalid score weight table")?;

        let symbols_attempted = symbols.len();
        tracing::info!("Total stocks: {symbols_attempted}");

        // Computed once, passed along, never re-read mid-run.
        let stamp = Local::now().format(RUN_STAMP_FORMAT).to_string();

        let outcomes = fetch::fetch_all(Arc::clone(&self.client), symbols).await;

        let mut snapshots = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => tracing::warn!("Skipping {}: {e}", outcome.requested),
            }
        }
        let snapshots_scored = snapshots.len();

        let decisions: Vec<TradeDecision> = snapshots
            .iter()
            .map(|snapshot| score(snapshot, &self.policy, self.capital, &self.strategy))
            .collect();

        let picks = ranker::rank(decisions);
        tracing::info!("Total picks: {}", picks.len());

        let outcome = sink
            .persist(&picks, &stamp, mode)
            .await
            .context("persisting trade picks")?;

        if let Some(notifier) = notifier {
            if let Err(e) = notifier.notify(&picks, &stamp).await {
                tracing::warn!(
                    "Notification via {} failed (picks already persisted): {e}",
                    notifier.name()
                );
            }
        }

        Ok(RunReport {
            symbols_attempted,
            snapshots_scored,
            decisions_persisted: outcome.rows_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use sheet_store::CsvWorksheet;
    use tempfile::TempDir;

    use super::*;
    use crate::testutil::spawn_stub;

    fn runner(base: String) -> PickRunner {
        PickRunner::new(
            Arc::new(StreakClient::new(base.clone(), base)),
            RiskPolicy::default(),
            ScoringStrategy::default(),
            100_000.0,
        )
    }

    #[tokio::test]
    async fn run_scores_only_successful_snapshots() {
        let base = spawn_stub().await;
        let dir = TempDir::new().unwrap();
        let sheet = CsvWorksheet::new(dir.path(), "picks");

        let symbols: Vec<String> = ["NSE:AAA", "NSE:BBB", "NSE:FAIL", "NSE:CCC", "NSE:DDD"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = runner(base)
            .run(symbols, SinkMode::Append, &sheet, None)
            .await
            .unwrap();

        assert_eq!(report.symbols_attempted, 5);
        assert_eq!(report.snapshots_scored, 4);
        // The stub serves a strong-trend snapshot, so every scored symbol
        // clears the entry threshold and lands in the worksheet.
        assert_eq!(report.decisions_persisted, 4);

        let persisted = sheet
            .persist(&[], "unused", SinkMode::Read)
            .await
            .unwrap()
            .rows
            .unwrap();
        assert_eq!(persisted.len(), 4);
        // date_time, weighted_score, ..., enter flag at column 9.
        assert!(persisted.iter().all(|row| row[9] == "true"));
        assert!(persisted.iter().all(|row| row[1] == "0.705"));
    }

    #[tokio::test]
    async fn persisted_rows_survive_a_second_append_run() {
        let base = spawn_stub().await;
        let dir = TempDir::new().unwrap();
        let sheet = CsvWorksheet::new(dir.path(), "picks");

        let symbols = vec!["NSE:AAA".to_string()];
        let runner = runner(base);

        runner
            .run(symbols.clone(), SinkMode::Append, &sheet, None)
            .await
            .unwrap();
        runner
            .run(symbols, SinkMode::Append, &sheet, None)
            .await
            .unwrap();

        let persisted = sheet
            .persist(&[], "unused", SinkMode::Read)
            .await
            .unwrap()
            .rows
            .unwrap();
        assert_eq!(persisted.len(), 2);
    }
}
