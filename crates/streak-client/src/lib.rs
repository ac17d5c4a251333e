use std::time::Duration;

use picker_core::{FetchError, IndicatorSnapshot, SymbolId};
use reqwest::Client;

mod universe;

pub use universe::DEFAULT_SCREENER_URL;

pub const DEFAULT_ANALYTICS_URL: &str =
    "https://technicalwidget.streak.tech/api/streak_tech_analysis/";

/// Client for the technical-analysis widget endpoint. One shared connection
/// pool; every snapshot retrieval is a single attempt. Retry policy, if
/// any, belongs to the caller.
#[derive(Clone)]
pub struct StreakClient {
    client: Client,
    analytics_url: String,
    screener_url: String,
}

impl StreakClient {
    pub fn new(analytics_url: impl Into<String>, screener_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            analytics_url: analytics_url.into(),
            screener_url: screener_url.into(),
        }
    }

    /// Retrieve the hourly indicator snapshot for one symbol.
    ///
    /// The endpoint does not echo identity, so `segment`/`symbol` are
    /// stamped onto the snapshot from the requested id. Any transport,
    /// status, or decode problem surfaces as a per-symbol [`FetchError`].
    pub async fn fetch_snapshot(&self, id: &SymbolId) -> Result<IndicatorSnapshot, FetchError> {
        let seg_sym = id.to_string();
        let response = self
            .client
            .get(&self.analytics_url)
            .query(&[("timeFrame", "hour"), ("stock", seg_sym.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut snapshot: IndicatorSnapshot = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        snapshot.segment = id.segment.clone();
        snapshot.symbol = id.symbol.clone();

        tracing::debug!("Fetched snapshot for {}", id);
        Ok(snapshot)
    }
}
