use crate::fetcher::FetchError;
use thiserror::Error;

/// Why a monitor run produced no results.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("monitor has no data source url")]
    MissingConfig,

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("could not extract text from the fetched document")]
    Extraction,

    #[error("no data available for analysis")]
    NoData,
}

impl ProcessError {
    /// Stable code reported to the trigger caller.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingConfig => "missing_config",
            Self::Fetch(_) => "fetch_error",
            Self::Extraction => "extraction_error",
            Self::NoData => "no_data",
        }
    }

    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.should_retry(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_reason_codes() {
        assert_eq!(ProcessError::MissingConfig.reason(), "missing_config");
        assert_eq!(ProcessError::Extraction.reason(), "extraction_error");
        assert_eq!(ProcessError::NoData.reason(), "no_data");
        assert_eq!(
            ProcessError::Fetch(FetchError::RequestTimeout).reason(),
            "fetch_error"
        );
    }

    #[test]
    fn test_retriable_follows_fetch_error() {
        assert!(ProcessError::Fetch(FetchError::ConnectTimeout).is_retriable());
        assert!(
            ProcessError::Fetch(FetchError::Http {
                status: StatusCode::BAD_GATEWAY,
                retriable: true,
            })
            .is_retriable()
        );
        assert!(
            !ProcessError::Fetch(FetchError::Http {
                status: StatusCode::NOT_FOUND,
                retriable: false,
            })
            .is_retriable()
        );
        assert!(!ProcessError::NoData.is_retriable());
        assert!(!ProcessError::MissingConfig.is_retriable());
    }
}
