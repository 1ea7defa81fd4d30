//! Repository modules, one per entity. Each adds methods to `DtlService`.
//!
//! Functions taking a bare `&libsql::Connection` are shared between plain
//! service methods and multi-step writes that run on a transaction.

pub mod comment;
pub mod configuration;
pub mod generation;
pub mod interface;
pub mod library;
pub mod logic;
pub mod ontology;
pub mod review;
pub mod segmentation;
pub mod sync_event;
pub mod test_case;
pub mod unit;
pub mod user;
