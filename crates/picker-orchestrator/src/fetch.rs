//! Concurrent, failure-isolated retrieval of indicator snapshots.

use std::sync::Arc;

use picker_core::{FetchError, IndicatorSnapshot, SymbolId};
use streak_client::StreakClient;
use tokio::task::JoinSet;

/// Result of one retrieval, tagged with the symbol string it was issued for.
#[derive(Debug)]
pub struct FetchOutcome {
    pub requested: String,
    pub result: Result<IndicatorSnapshot, FetchError>,
}

/// Retrieve one snapshot per input symbol, all in flight concurrently over
/// the shared client pool.
///
/// A failure for one symbol (malformed id, network error, bad status,
/// undecodable body) never cancels or delays its siblings; it comes back as
/// a tagged failure entry instead. Duplicate inputs are each retrieved
/// independently. Outcomes come back in request order regardless of
/// completion order. One attempt per symbol, no internal retry.
pub async fn fetch_all(client: Arc<StreakClient>, symbols: Vec<String>) -> Vec<FetchOutcome> {
    let mut tasks = JoinSet::new();

    for (index, seg_sym) in symbols.into_iter().enumerate() {
        let client = Arc::clone(&client);
        tasks.spawn(async move {
            let result = match seg_sym.parse::<SymbolId>() {
                Ok(id) => client.fetch_snapshot(&id).await,
                Err(e) => Err(e),
            };
            (
                index,
                FetchOutcome {
                    requested: seg_sym,
                    result,
                },
            )
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!("Fetch task error: {e}"),
        }
    }

    // Tasks finish in completion order; restore request order so everything
    // downstream is a pure function of the input set.
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

#[cfg(test)]
mod tests {
    use picker_core::FetchError;

    use super::*;
    use crate::testutil::spawn_stub;

    #[tokio::test]
    async fn one_failure_never_aborts_the_batch() {
        let base = spawn_stub().await;
        let client = Arc::new(StreakClient::new(base.clone(), base));

        let symbols: Vec<String> = ["NSE:AAA", "NSE:BBB", "NSE:FAIL", "NSE:CCC", "NSE:DDD"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outcomes = fetch_all(client, symbols).await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes.iter().filter(|o| o.result.is_ok()).count(), 4);

        let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].requested, "NSE:FAIL");
        assert!(matches!(
            failed[0].result,
            Err(FetchError::Status(500))
        ));
    }

    #[tokio::test]
    async fn malformed_symbol_id_is_a_tagged_failure() {
        let base = spawn_stub().await;
        let client = Arc::new(StreakClient::new(base.clone(), base));

        let outcomes = fetch_all(
            client,
            vec!["JUNK".to_string(), "NSE:AAA".to_string()],
        )
        .await;

        assert_eq!(outcomes.len(), 2);
        let junk = outcomes.iter().find(|o| o.requested == "JUNK").unwrap();
        assert!(matches!(
            junk.result,
            Err(FetchError::MalformedSnapshot(_))
        ));
        let ok = outcomes.iter().find(|o| o.requested == "NSE:AAA").unwrap();
        assert!(ok.result.is_ok());
    }

    #[tokio::test]
    async fn duplicates_are_fetched_independently() {
        let base = spawn_stub().await;
        let client = Arc::new(StreakClient::new(base.clone(), base));

        let outcomes = fetch_all(
            client,
            vec!["NSE:AAA".to_string(), "NSE:AAA".to_string()],
        )
        .await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[tokio::test]
    async fn outcomes_come_back_in_request_order() {
        let base = spawn_stub().await;
        let client = Arc::new(StreakClient::new(base.clone(), base));

        let symbols: Vec<String> = ["NSE:AAA", "NSE:FAIL", "NSE:BBB", "NSE:CCC"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outcomes = fetch_all(client, symbols.clone()).await;

        let requested: Vec<&str> = outcomes.iter().map(|o| o.requested.as_str()).collect();
        assert_eq!(requested, symbols);
    }

    #[tokio::test]
    async fn identity_is_stamped_from_the_requested_id() {
        let base = spawn_stub().await;
        let client = Arc::new(StreakClient::new(base.clone(), base));

        let outcomes = fetch_all(client, vec!["NSE:AAA".to_string()]).await;
        let snapshot = outcomes[0].result.as_ref().unwrap();
        assert_eq!(snapshot.segment, "NSE");
        assert_eq!(snapshot.symbol, "AAA");
    }
}
