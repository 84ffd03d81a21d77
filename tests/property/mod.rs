//! Property-based tests for the command contract and discovery
