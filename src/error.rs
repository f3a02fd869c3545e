// src/error.rs
// =============================================================================
// Error types for the page analysis engine.
//
// Each variant corresponds to one way an analysis can fail as a whole.
// Problems with individual links never show up here: an unreachable link
// is just counted, not raised.
//
// The front end needs an HTTP-style status for every failure, so each
// variant knows which status it maps to (see `status_code`).
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// The user input could not be turned into a URL
    #[error("invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// The page could not be fetched at all (DNS, connect, timeout, TLS)
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page answered, but not with 200 OK
    #[error("HTTP error: {status} from {url}")]
    UpstreamStatus { url: String, status: u16 },

    /// The response body could not be read
    #[error("failed to read response from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The document could not be queried
    #[error("failed to parse HTML: {0}")]
    Parse(String),

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl AnalyzeError {
    /// The HTTP status a front end should answer with for this error.
    ///
    /// Upstream statuses are passed through unchanged.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalyzeError::InvalidUrl { .. } => 400,
            AnalyzeError::UpstreamStatus { status, .. } => *status,
            AnalyzeError::Fetch { .. } => 502,
            AnalyzeError::ReadBody { .. } | AnalyzeError::Parse(_) | AnalyzeError::Client(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
