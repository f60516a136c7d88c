//! crates/logging/src/token.rs
//! Per-materialization identity tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one evaluation of an output definition.
///
/// Every call to [`Output::data`](crate::Output::data) draws a fresh token.
/// Color schemes compiled for that evaluation are registered under
/// `"{name}-{token}"`, so two facades that share a definition never overwrite
/// each other's schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextToken(u64);

impl ContextToken {
    /// Draws the next token from the process-wide sequence.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
