//! Reporting: human-readable rendering of estimates and batches.

pub mod format;

pub use format::*;
