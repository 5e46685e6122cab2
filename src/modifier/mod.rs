//! Structural modification: pattern-based delete and fragment merge.

mod delete;
mod merge;

pub use delete::{delete, DeleteResult};
pub use merge::{merge, try_merge, MergeOptions, MergeOutcome, MergeResult};
