//! # dtl-core
//!
//! Core types for the Digital Twin Legislation (DTL) workflow API.
//!
//! This crate provides the foundational types shared across all DTL crates:
//! - Entity structs for the record graph (libraries, units, artifacts, tests, comments)
//! - Status enums for reviews, test results, segmentation suggestions, and sync events
//! - Request payloads accepted by the Resource API
//! - Response envelopes for composite operations (generate-all, overview, test runs)
//! - `CoreError` for payload validation failures
//! - Character-safe text truncation used when embedding text in prompts and defaults

pub mod entities;
pub mod enums;
pub mod errors;
pub mod payloads;
pub mod responses;
pub mod text;
