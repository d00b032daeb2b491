//! # LLM Provider Seam
//!
//! Pluggable interface for large language model backends. Absence of a
//! provider is normal; every caller has a deterministic path.

use crate::domain::errors::HarnessResult;
use async_trait::async_trait;

/// Pluggable interface for LLM completion backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a completion request.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TransportFailure` if the backend could not
    /// be reached or rejected the request.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> HarnessResult<String>;

    /// Returns the provider name (e.g. "openai", "ollama").
    fn provider_name(&self) -> &str;

    /// Returns the model identifier being used.
    fn model_name(&self) -> &str;

    /// Checks whether the provider is reachable.
    async fn is_available(&self) -> bool;
}
