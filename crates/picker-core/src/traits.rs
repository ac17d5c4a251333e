use async_trait::async_trait;

use crate::{NotifyError, PersistOutcome, SinkError, SinkMode, TradeDecision};

/// Tabular store for ranked trade decisions.
///
/// One persisted worksheet per sink instance. Single-writer usage is
/// assumed: concurrent runs against the same store are unsupported and may
/// interleave rows unpredictably.
#[async_trait]
pub trait TradeSink: Send + Sync {
    /// Persist `picks` under the given run stamp.
    ///
    /// `SinkMode::Append` on a store with fewer than two existing rows
    /// (empty or header-only) is treated as `Overwrite`, so the first run
    /// always lays out header + rows. `SinkMode::Read` ignores `picks` and
    /// returns the persisted rows without mutation.
    async fn persist(
        &self,
        picks: &[TradeDecision],
        stamp: &str,
        mode: SinkMode,
    ) -> Result<PersistOutcome, SinkError>;
}

/// Delivery channel for a run's ranked picks. Failures here must never roll
/// back persistence; callers log and continue.
#[async_trait]
pub trait PickNotifier: Send + Sync {
    async fn notify(&self, picks: &[TradeDecision], stamp: &str) -> Result<(), NotifyError>;

    fn name(&self) -> &str;
}
