//! # dtl-artifacts
//!
//! Generates DTL artifacts with a [`dtl_llm::TextGenerator`] and persists
//! them through [`dtl_db::service::DtlService`].
//!
//! Every generate operation follows the same path: load the owning record,
//! build the prompt, call the generator, apply the [`defaults`] policy to
//! whatever JSON came back, then upsert. Because the generator never fails
//! and the defaults never produce an empty required field, a generate call
//! only errors when the record is missing or the store rejects the write.

pub mod defaults;
mod error;
mod orchestrator;

pub use error::ArtifactError;
pub use orchestrator::Orchestrator;
