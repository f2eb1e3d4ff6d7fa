use thiserror::Error;

use super::rate_limiter::RateLimitError;

/// Failure reported by an external collaborator (media fetch, transcription,
/// dialogue segmentation, storage or feedback).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned {status}: {body}")]
    Server {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{0} returned no usable output")]
    EmptyOutput(&'static str),
    #[error("{service} returned an invalid response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
    #[error("{tool} failed: {message}")]
    Process { tool: &'static str, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub fn request(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Request { service, source }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
