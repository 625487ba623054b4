//! Explorer endpoint models
//!
//! The REST resources under test.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Explorer REST resources
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    History,
    Tokens,
    TokenPairs,
}

impl Endpoint {
    /// Get endpoint display name
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::History => "History",
            Endpoint::Tokens => "Tokens",
            Endpoint::TokenPairs => "Token Pairs",
        }
    }

    /// Get all endpoints
    pub fn all() -> Vec<Endpoint> {
        vec![Endpoint::History, Endpoint::Tokens, Endpoint::TokenPairs]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Endpoint> {
        match s.to_lowercase().as_str() {
            "history" | "ohlcv" => Some(Endpoint::History),
            "tokens" | "token" => Some(Endpoint::Tokens),
            "token-pairs" | "token_pairs" | "pairs" => Some(Endpoint::TokenPairs),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_str() {
        assert_eq!(Endpoint::from_str("history"), Some(Endpoint::History));
        assert_eq!(Endpoint::from_str("TOKENS"), Some(Endpoint::Tokens));
        assert_eq!(Endpoint::from_str("token-pairs"), Some(Endpoint::TokenPairs));
        assert_eq!(Endpoint::from_str("blocks"), None);
    }

    #[test]
    fn test_all_endpoints() {
        assert_eq!(Endpoint::all().len(), 3);
    }
}
