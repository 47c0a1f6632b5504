use thiserror::Error;

use crate::db::StoreError;
use crate::rate_limit::CounterError;
use crate::validation::ValidationError;

/// Failure of a lookup, returned to the caller as a typed result.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    InvalidFormat(#[from] ValidationError),

    #[error("too many requests")]
    RateLimited,

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    UpstreamRejected(String),

    #[error("Address {0:?} not found in DB or external source")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Rate limiter error: {0}")]
    Counter(#[from] CounterError),
}
