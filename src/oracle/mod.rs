//! The language-model completion service used for relevance decisions.

pub mod backoff;
pub mod client;
pub mod errors;
pub mod retry;

pub use client::{HttpOracle, OracleSettings};
pub use errors::OracleError;
pub use retry::{RetryPolicy, complete_with_retry};

use async_trait::async_trait;

/// What shape of answer the prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// A single JSON object.
    Json,
    /// Free text.
    Text,
}

#[async_trait]
pub trait CompletionOracle: Send + Sync {
    /// Complete a prompt and return the raw response text.
    async fn complete(&self, prompt: &str, format: ResponseFormat) -> Result<String, OracleError>;
}
