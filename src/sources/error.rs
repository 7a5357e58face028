use thiserror::Error;

/// Why a remote value was not used. Every variant ends in the same fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timed out after {0}s")]
    Timeout(u64),
    #[error("Bad status: {0}")]
    Status(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Implausible value: {0}")]
    Implausible(String),
}

impl FetchError {
    /// Short label for the status bar
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => "Offline",
            FetchError::Status(_) => "Source error",
            FetchError::Parse(_) => "Malformed data",
            FetchError::Implausible(_) => "Rejected data",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Network(format!("Request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}
