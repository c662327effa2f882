//! Application state, held in reactive cells and advanced only by pure reducers
//!
//! Every state type here has a `reduce(self, event) -> Self` that does no I/O.
//! The stores wrap a state in a `futures_signals::signal::Mutable` so a UI (or the cli)
//! can observe it, and hand out the ids used to correlate async completions.

mod authz;
mod notification;
mod portfolio;

pub use authz::*;
pub use notification::*;
pub use portfolio::*;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Pending,
    #[default]
    Idle,
    Rejected,
}

/// Correlates a mutation with its record and notifications
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sequencing token for a fetch, completions carrying anything but the latest are dropped
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn new(token: u64) -> Self {
        Self(token)
    }
}

/// Monotonic counter shared by clones
#[derive(Clone, Debug, Default)]
pub(crate) struct Counter(Arc<AtomicU64>);

impl Counter {
    // starts at 1 so that a default token never matches an issued one
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}
