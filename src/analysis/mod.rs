pub mod keywords;
pub mod sentiment;
pub mod stopwords;

use crate::config::Config;
use serde::Serialize;
use std::{fmt, path::Path, str::FromStr};
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

pub use keywords::KeywordExtractor;
pub use sentiment::{SentimentScorer, VaderScorer};
pub use stopwords::Stopwords;

#[cfg(test)]
pub use sentiment::MockSentimentScorer;

/// Supported values of a monitor's `analysis_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Sentiment,
    Keywords,
}

#[derive(Debug, Error, PartialEq)]
#[error("unsupported analysis type: {0}")]
pub struct UnsupportedAnalysisType(pub String);

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Sentiment => "sentiment",
            AnalysisKind::Keywords => "keywords",
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = UnsupportedAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentiment" => Ok(AnalysisKind::Sentiment),
            "keywords" => Ok(AnalysisKind::Keywords),
            other => Err(UnsupportedAnalysisType(other.to_string())),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result mapping of one run. Serializes as a single-key object, e.g.
/// `{"sentiment_compound": 0.42}` or `{"keywords": ["rust", "async"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisResults {
    SentimentCompound(Option<f64>),
    Keywords(Vec<String>),
    UnsupportedAnalysisType(String),
}

/// Analysis configuration built once at startup and shared read-only.
pub struct Analyzers {
    sentiment: Box<dyn SentimentScorer>,
    keywords: KeywordExtractor,
}

impl Analyzers {
    pub fn new(sentiment: Box<dyn SentimentScorer>, keywords: KeywordExtractor) -> Self {
        Self {
            sentiment,
            keywords,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let stopwords = Stopwords::load(config.stopwords_path().map(Path::new));
        info!(
            stopwords = stopwords.len(),
            keyword_limit = config.keyword_limit(),
            "Analyzers ready"
        );
        Self::new(
            Box::new(VaderScorer::new()),
            KeywordExtractor::new(stopwords, config.keyword_limit()),
        )
    }

    /// Run the analysis named by `analysis_type` over already extracted text.
    /// Unknown types are reported in the result, never as an error.
    pub fn analyze(&self, analysis_type: &str, text: &str) -> AnalysisResults {
        match analysis_type.parse::<AnalysisKind>() {
            Ok(AnalysisKind::Sentiment) => {
                AnalysisResults::SentimentCompound(self.sentiment.compound(text))
            }
            Ok(AnalysisKind::Keywords) => AnalysisResults::Keywords(self.keywords.extract(text)),
            Err(UnsupportedAnalysisType(kind)) => {
                warn!(analysis_type = %kind, "Unhandled analysis type");
                AnalysisResults::UnsupportedAnalysisType(kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyzers_with(scorer: MockSentimentScorer) -> Analyzers {
        Analyzers::new(
            Box::new(scorer),
            KeywordExtractor::new(Stopwords::english(), 10),
        )
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!("sentiment".parse(), Ok(AnalysisKind::Sentiment));
        assert_eq!("keywords".parse(), Ok(AnalysisKind::Keywords));
        assert_eq!(
            "Sentiment".parse::<AnalysisKind>(),
            Err(UnsupportedAnalysisType("Sentiment".to_string()))
        );
        assert_eq!(AnalysisKind::Keywords.to_string(), "keywords");
    }

    #[test]
    fn test_results_wire_shape() {
        assert_eq!(
            serde_json::to_value(AnalysisResults::SentimentCompound(Some(0.5))).unwrap(),
            json!({"sentiment_compound": 0.5})
        );
        assert_eq!(
            serde_json::to_value(AnalysisResults::SentimentCompound(None)).unwrap(),
            json!({"sentiment_compound": null})
        );
        assert_eq!(
            serde_json::to_value(AnalysisResults::Keywords(vec!["rust".into()])).unwrap(),
            json!({"keywords": ["rust"]})
        );
        assert_eq!(
            serde_json::to_value(AnalysisResults::UnsupportedAnalysisType("topics".into()))
                .unwrap(),
            json!({"unsupported_analysis_type": "topics"})
        );
    }

    #[test]
    fn test_sentiment_dispatch_uses_scorer() {
        let mut scorer = MockSentimentScorer::new();
        scorer
            .expect_compound()
            .withf(|text| text == "happy days")
            .times(1)
            .returning(|_| Some(0.7));

        let results = analyzers_with(scorer).analyze("sentiment", "happy days");
        assert_eq!(results, AnalysisResults::SentimentCompound(Some(0.7)));
    }

    #[test]
    fn test_keywords_dispatch_skips_scorer() {
        let mut scorer = MockSentimentScorer::new();
        scorer.expect_compound().never();

        let results = analyzers_with(scorer).analyze("keywords", "rust rust tokio");
        assert_eq!(
            results,
            AnalysisResults::Keywords(vec!["rust".into(), "tokio".into()])
        );
    }

    #[test]
    fn test_unknown_kind_is_explicit() {
        let mut scorer = MockSentimentScorer::new();
        scorer.expect_compound().never();

        let results = analyzers_with(scorer).analyze("topics", "anything");
        assert_eq!(
            results,
            AnalysisResults::UnsupportedAnalysisType("topics".into())
        );
    }
}
