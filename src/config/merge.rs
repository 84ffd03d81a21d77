//! Merge rules for settings sources.

pub(crate) mod merge_policy;
