//! # dtl-llm
//!
//! Remote text generation for DTL artifacts.
//!
//! - [`GenerationClient`] calls an Azure-OpenAI-style chat completion
//!   endpoint. It never fails: an unconfigured client or a failed call yields
//!   a tagged stub string (see [`is_stub_response`]).
//! - [`TextGenerator`] is the seam the orchestrator depends on, so tests can
//!   script responses without a network.
//! - [`extract`] pulls a JSON value out of free-form model output.
//! - [`prompts`] holds the fixed prompt templates, one per artifact kind.

mod client;
mod error;
pub mod extract;
pub mod prompts;

pub use client::{
    GenerationClient, NO_RESPONSE_PREFIX, STUB_PREFIX, TextGenerator, is_stub_response,
};
pub use extract::{JsonExtraction, extract_json};
