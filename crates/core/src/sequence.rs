// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequence markers used for staleness checks.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic ordering marker carried by every status event.
///
/// Markers live in the epoch-milliseconds domain so backend-stamped push
/// messages and locally-stamped poll requests compare meaningfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(pub u64);

impl Sequence {
    pub const ZERO: Sequence = Sequence(0);

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Sequence {
    fn from(n: u64) -> Self {
        Sequence(n)
    }
}

/// Issues local sequence markers that never go backwards.
///
/// Markers are strictly increasing: two requests in the same millisecond,
/// or a wall-clock step backwards, still get distinct ordered markers.
/// Clones share state.
#[derive(Clone)]
pub struct Sequencer<C: Clock> {
    clock: C,
    last: Arc<AtomicU64>,
}

impl<C: Clock> Sequencer<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: Arc::new(AtomicU64::new(0)) }
    }

    /// Marker for "now": the clock's epoch ms, bumped past the last marker if needed.
    pub fn next(&self) -> Sequence {
        let now = self.clock.epoch_ms();
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let next = now.max(prev.saturating_add(1));
            match self.last.compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Sequence(next),
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
