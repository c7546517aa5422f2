use vader_sentiment::SentimentIntensityAnalyzer;

/// Scores text polarity on a normalized [-1, 1] scale.
#[cfg_attr(test, mockall::automock)]
pub trait SentimentScorer: Send + Sync {
    /// `None` when there is nothing to score.
    fn compound(&self, text: &str) -> Option<f64>;
}

/// Lexicon and rule based scorer (VADER).
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> Option<f64> {
        if text.is_empty() {
            return None;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(-1.0, 1.0))
    }
}
