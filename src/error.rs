//! Error types for the site generation pipeline.
//!
//! Two layers: [`ServiceError`] describes a single failed call to a remote
//! generative service and carries its retry classification; [`ApiError`] is the
//! crate-wide error that pipelines, the orchestrator and the CLI propagate.

use std::path::PathBuf;
use thiserror::Error;

/// How the retry executor treats a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Retry and count the attempt against the budget.
    Counted,
    /// Connection-level failure; counting is decided by the backoff policy.
    Connection,
    /// Never retried.
    Terminal,
}

/// Failure of a single call to the text or image service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to connect: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Service returned an error: {0}")]
    Api(String),
}

impl ServiceError {
    pub fn retry_class(&self) -> RetryClass {
        match self {
            ServiceError::RateLimited(_)
            | ServiceError::Timeout(_)
            | ServiceError::Unavailable(_)
            | ServiceError::InvalidRequest(_)
            | ServiceError::Api(_) => RetryClass::Counted,
            ServiceError::Connection(_) => RetryClass::Connection,
            ServiceError::Unauthorized(_) => RetryClass::Terminal,
        }
    }

    /// Classify an HTTP status returned by a provider.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ServiceError::Unauthorized(body),
            408 | 504 => ServiceError::Timeout(body),
            429 => ServiceError::RateLimited(body),
            502 | 503 => ServiceError::Unavailable(body),
            400 | 404 | 413 | 422 => ServiceError::InvalidRequest(body),
            _ => ServiceError::Api(format!("status {}: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            ServiceError::from_status(status.as_u16(), error.to_string())
        } else if error.is_timeout() {
            ServiceError::Timeout(error.to_string())
        } else if error.is_connect() {
            ServiceError::Connection(error.to_string())
        } else {
            ServiceError::Api(format!("HTTP error: {}", error))
        }
    }
}

/// Terminal outcome of [`crate::retry::RetryExecutor::execute`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryError {
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    Exhausted {
        attempts: u32,
        last_error: ServiceError,
    },

    #[error("Request rejected without retry: {0}")]
    Rejected(ServiceError),
}

/// Crate-wide errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{stage} failed: {source}")]
    Retry {
        stage: String,
        #[source]
        source: RetryError,
    },

    #[error("Could not extract page content: {0}")]
    ExtractionFailed(String),

    #[error("Image fetch failed: {0}")]
    ImageFetchFailed(String),

    #[error("{0} pipeline failed: {1}")]
    PipelineFailed(&'static str, String),

    #[error("Generation deadline of {0}s elapsed before {1} finished")]
    DeadlineExceeded(u64, &'static str),

    #[error("Generation failed after {attempts} attempts: {last_error}")]
    RunFailed { attempts: u32, last_error: String },

    #[error("Research failed: {0}")]
    ResearchFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token usage log error: {0}")]
    UsageLog(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn retry(stage: impl Into<String>, source: RetryError) -> Self {
        ApiError::Retry {
            stage: stage.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::UsageLog(err.to_string())
    }
}
