//! HTTP module for explorer API testing
//!
//! Provides the request executor that every endpoint suite goes through.

mod client;
#[cfg(test)]
pub mod stub;

pub use client::{
    with_query, ExchangeOutcome, ExecutorConfig, NormalizedResponse, RequestExecutor,
    RequestOptions, NO_RESPONSE,
};
