//! Entity structs for the DTL record graph.
//!
//! Each entity maps to a table in the libSQL schema. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation. Singleton artifacts (ontology, interface, configuration, logic,
//! review) carry no id of their own: they are keyed by the owning unit.

mod artifacts;
mod comment;
mod library;
mod review;
mod segmentation;
mod sync_event;
mod test_case;
mod unit;
mod user;

pub use artifacts::{Configuration, Interface, Logic, Ontology, DEFAULT_LOGIC_LANGUAGE};
pub use comment::Comment;
pub use library::Library;
pub use review::Review;
pub use segmentation::SegmentationSuggestion;
pub use sync_event::SyncEvent;
pub use test_case::{TestCase, TestRun};
pub use unit::Unit;
pub use user::User;
