//! Settings sources, one module per origin.

pub(crate) mod env_vars;
pub(crate) mod explicit_file;
pub mod global_file;
