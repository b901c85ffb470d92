// src/enrichment/mod.rs
pub mod gaps;
pub mod merge;
pub mod orchestrator;
pub mod query;

pub use gaps::{analyze_gaps, FieldGap, GapReport};
pub use merge::{merge_candidate, MergeOutcome};
pub use orchestrator::{process_facilities, EnrichOptions, RecordOutcome};
pub use query::build_query;
