use crate::response::LastError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid API key: expected `<key>-<datacenter>`")]
    InvalidApiKey,
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("Request parameters must serialize to a JSON object")]
    InvalidParams,
    #[error("Invalid HTTP client configuration: {0}")]
    Http(reqwest::Error),
    /// No response was obtained at all (DNS, TCP, TLS or timeout failure).
    #[error("Could not connect to API. Check your credentials: {0}")]
    Connectivity(reqwest::Error),
    /// The API answered, but not with the status the operation requires.
    #[error("Could not fetch {resource} from API (status {status}){}", fmt_captured(.error))]
    Fetch {
        resource: &'static str,
        status: u16,
        error: Option<LastError>,
    },
    #[error("Could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure happened before any response was received.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity(_))
    }
}

fn fmt_captured(error: &Option<LastError>) -> String {
    match error {
        Some(err) => format!(": {err}"),
        None => String::new(),
    }
}
