//! Relay `cargo test` output while adding running totals after every
//! `test result:` summary line.
//!
//! A workspace test run prints one summary per test binary. [`relay::relay`]
//! passes every line through untouched and, after each summary, appends a
//! derived `sum:` line with the totals across all binaries seen so far.

pub mod relay;
pub mod summary;
