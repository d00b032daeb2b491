//! # Scenario Generation
//!
//! Natural-language scenario translation with deterministic and
//! LLM-backed modes.
//!
//! - [`ScenarioTranslator`]: intent to [`crate::domain::value_objects::OrderSpec`]
//! - [`SmartStub`]: intent to ISO 20022 payment messages, with caching
//! - [`LlmProvider`]: pluggable completion backend seam

pub mod llm;
pub mod smart_stub;
pub mod translator;

pub use llm::LlmProvider;
pub use smart_stub::SmartStub;
pub use translator::ScenarioTranslator;
