use std::sync::Arc;

use crate::services::extractor::{self, Extraction, ScoreboardSelectors};
use crate::services::fetcher::{FetchError, Fetcher};

/// One pull of the scoreboard page: fetch, then extract.
#[derive(Clone)]
pub struct LiveScraper {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    selectors: ScoreboardSelectors,
}

impl LiveScraper {
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            selectors: ScoreboardSelectors::default(),
        }
    }

    pub fn with_selectors(mut self, selectors: ScoreboardSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// A fetch failure stops here; nothing is extracted from error content.
    pub async fn scrape(&self) -> Result<Extraction, FetchError> {
        let raw = self.fetcher.fetch(&self.url).await?;
        let extraction = extractor::extract(&raw, &self.selectors);

        tracing::debug!(
            "Extracted {} matches ({} skipped) from {}",
            extraction.records.len(),
            extraction.skipped.len(),
            self.url
        );

        Ok(extraction)
    }
}
