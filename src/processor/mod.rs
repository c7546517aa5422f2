pub mod errors;

pub use errors::ProcessError;

use crate::{
    analysis::{AnalysisResults, Analyzers},
    entities::Monitor,
    extractor::{detect_language, extract_text},
    fetcher::Fetcher,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub results: AnalysisResults,
    pub lang: Option<String>,
    /// Hex MD5 of the analysed text.
    pub content_checksum: String,
}

/// Fetch, extract and analyse one monitor's data source.
///
/// A run either yields a complete outcome or a [`ProcessError`]; partial
/// results are never returned and nothing is retried here.
pub struct MonitorProcessor {
    fetcher: Arc<dyn Fetcher>,
    analyzers: Arc<Analyzers>,
}

impl MonitorProcessor {
    pub fn new(fetcher: Arc<dyn Fetcher>, analyzers: Arc<Analyzers>) -> Self {
        Self { fetcher, analyzers }
    }

    #[instrument(skip_all, fields(monitor_id = monitor.id, url = %monitor.data_source_url))]
    pub async fn process(&self, monitor: &Monitor) -> Result<ProcessOutcome, ProcessError> {
        let outcome = self.run(monitor).await;
        if let Err(e) = &outcome {
            warn!(reason = e.reason(), error = %e, "Monitor processing failed");
        }
        outcome
    }

    async fn run(&self, monitor: &Monitor) -> Result<ProcessOutcome, ProcessError> {
        let url = monitor.data_source_url.trim();
        if url.is_empty() {
            return Err(ProcessError::MissingConfig);
        }

        let page = self.fetcher.fetch(url).await?;
        debug!(
            status = page.status.as_u16(),
            charset = ?page.charset,
            bytes = page.body_raw.len(),
            "Fetched data source"
        );

        let text = if is_web_page(url) {
            extract_text(&page.body_utf8).ok_or(ProcessError::Extraction)?
        } else {
            page.body_utf8
        };

        if text.trim().is_empty() {
            return Err(ProcessError::NoData);
        }

        let results = self.analyzers.analyze(&monitor.analysis_type, &text);
        debug!(analysis_type = %monitor.analysis_type, "Analysis complete");

        Ok(ProcessOutcome {
            results,
            lang: detect_language(&text),
            content_checksum: format!("{:x}", md5::compute(text.as_bytes())),
        })
    }
}

fn is_web_page(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}
