//! Response schema validation
//!
//! Presence checks for the keys each explorer endpoint promises to return.

mod schema;

pub use schema::{validate, validate_array, Schema, ValidationResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schemas for every response shape the suites check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSet {
    pub history: Schema,
    pub tokens_response: Schema,
    pub token: Schema,
    pub token_pairs_response: Schema,
    pub token_pair_response: Schema,
    pub token_pair: Schema,
    pub error: Schema,
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self {
            history: Schema::new(&["t", "o", "h", "l", "c", "v", "s"]),
            tokens_response: Schema::new(&["tokens", "success"]),
            token: Schema::new(&["id", "symbol", "name"])
                .with_optional(&["decimals", "address", "logo"]),
            token_pairs_response: Schema::new(&["pairs", "success"]),
            token_pair_response: Schema::new(&["pair", "success"]),
            token_pair: Schema::new(&["id", "base", "quote"]).with_optional(&["price", "volume"]),
            error: Schema::new(&["error"]),
        }
    }
}

/// Response shape to validate against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    History,
    TokensResponse,
    Token,
    TokenPairsResponse,
    TokenPairResponse,
    TokenPair,
    Error,
}

/// Validator bound to a configured schema set
#[derive(Clone, Debug, Default)]
pub struct SchemaValidator {
    schemas: SchemaSet,
}

impl SchemaValidator {
    pub fn new(schemas: SchemaSet) -> Self {
        Self { schemas }
    }

    pub fn schema(&self, kind: SchemaKind) -> &Schema {
        match kind {
            SchemaKind::History => &self.schemas.history,
            SchemaKind::TokensResponse => &self.schemas.tokens_response,
            SchemaKind::Token => &self.schemas.token,
            SchemaKind::TokenPairsResponse => &self.schemas.token_pairs_response,
            SchemaKind::TokenPairResponse => &self.schemas.token_pair_response,
            SchemaKind::TokenPair => &self.schemas.token_pair,
            SchemaKind::Error => &self.schemas.error,
        }
    }

    pub fn validate_kind(&self, kind: SchemaKind, record: &Value) -> ValidationResult {
        validate(record, self.schema(kind))
    }

    pub fn validate_array_kind(&self, kind: SchemaKind, records: &Value) -> ValidationResult {
        validate_array(records, self.schema(kind))
    }
}
