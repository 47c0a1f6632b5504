//! Counter key generation

use std::fmt;

/// A structured counter-store key that can be converted to a string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    /// Shared budget of one API route
    Route(String),
}

impl RateLimitKey {
    pub fn route(route: &str) -> Self {
        Self::Route(route.to_string())
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(route) => write!(f, "rate_limit:{}", route),
        }
    }
}
