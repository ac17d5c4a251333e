//! Symbol-universe discovery via the paginated screener listing.

use std::collections::BTreeSet;

use picker_core::FetchError;
use serde::Deserialize;

use crate::StreakClient;

pub const DEFAULT_SCREENER_URL: &str = "https://s-op.streak.tech/screeners/discover";

#[derive(Debug, Default, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    data: DiscoverData,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoverData {
    #[serde(default)]
    results: Vec<ScreenerGroup>,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ScreenerGroup {
    #[serde(default)]
    results: Vec<ScreenerEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ScreenerEntry {
    #[serde(default)]
    seg_sym: Option<String>,
}

impl StreakClient {
    /// Walk every screener page and collect the distinct `segment:symbol`
    /// strings. Used when a run is not given an explicit symbol set.
    pub async fn discover_symbols(&self) -> Result<BTreeSet<String>, FetchError> {
        let mut symbols = BTreeSet::new();
        let mut page = 1u32;

        loop {
            let response = self
                .client
                .get(&self.screener_url)
                .query(&[("pageNumber", page.to_string())])
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body: DiscoverResponse = response
                .json()
                .await
                .map_err(|e| FetchError::Decode(e.to_string()))?;

            for group in body.data.results {
                for entry in group.results {
                    if let Some(seg_sym) = entry.seg_sym {
                        symbols.insert(seg_sym);
                    }
                }
            }

            if page >= body.data.total_pages {
                break;
            }
            page += 1;
        }

        tracing::info!("Discovered {} symbols from {} screener pages", symbols.len(), page);
        Ok(symbols)
    }
}
