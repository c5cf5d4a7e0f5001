//! Budget manager implementation
//!
//! Counters live behind a single mutex. `can_make_call` and `record_call`
//! are separate operations and are only race-free when pages run one at a
//! time; concurrent callers use [`BudgetManager::try_reserve`], which checks
//! and claims a slot in one critical section.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Snapshot of budget usage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetState {
    /// Calls recorded so far in this run
    pub calls_made: u64,

    /// Ceiling on recorded calls
    pub max_calls: u64,

    /// Recorded calls keyed by call type label
    pub calls_by_type: BTreeMap<String, u64>,

    /// Calls left before the ceiling (never negative)
    pub remaining_calls: u64,

    /// Share of the budget used, 0 when `max_calls` is 0
    pub budget_used_percent: f64,
}

#[derive(Debug, Default)]
struct Counters {
    calls_made: u64,
    in_flight: u64,
    calls_by_type: BTreeMap<String, u64>,
}

impl Counters {
    fn committed_or_claimed(&self) -> u64 {
        self.calls_made + self.in_flight
    }

    fn record(&mut self, call_type: &str) {
        self.calls_made += 1;
        *self.calls_by_type.entry(call_type.to_string()).or_insert(0) += 1;
    }
}

/// Counts and caps costly operations across a run
#[derive(Debug)]
pub struct BudgetManager {
    max_calls: u64,
    counters: Mutex<Counters>,
}

impl BudgetManager {
    /// Creates a manager allowing at most `max_calls` recorded calls
    pub fn new(max_calls: u64) -> Self {
        tracing::info!("Budget manager initialized with max_calls={}", max_calls);
        Self {
            max_calls,
            counters: Mutex::new(Counters::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // Counters stay consistent even if a holder panicked mid-update
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true iff another call fits under the ceiling
    ///
    /// This is a pure read: it neither reserves nor records a slot. Slots held
    /// by outstanding reservations count as used.
    pub fn can_make_call(&self, call_type: &str) -> bool {
        let counters = self.lock();
        if counters.committed_or_claimed() >= self.max_calls {
            tracing::warn!(
                "Budget limit reached: {}/{} calls made (requested '{}')",
                counters.calls_made,
                self.max_calls,
                call_type
            );
            return false;
        }
        true
    }

    /// Records one call of `call_type`
    ///
    /// The ceiling is not re-checked here; recording past it is legal and
    /// silently exceeds the budget. Callers gate on [`Self::can_make_call`].
    pub fn record_call(&self, call_type: &str) {
        let mut counters = self.lock();
        counters.record(call_type);
        tracing::debug!(
            "Call recorded: type={}, total={}/{}",
            call_type,
            counters.calls_made,
            self.max_calls
        );
    }

    /// Atomically checks the ceiling and claims one slot
    ///
    /// Returns `None` when the budget is exhausted. The slot is released when
    /// the reservation is dropped, unless [`BudgetReservation::commit`] turns it
    /// into a recorded call first.
    pub fn try_reserve(&self, call_type: &str) -> Option<BudgetReservation<'_>> {
        let mut counters = self.lock();
        if counters.committed_or_claimed() >= self.max_calls {
            tracing::debug!(
                "No budget slot for '{}': {} recorded, {} in flight, max {}",
                call_type,
                counters.calls_made,
                counters.in_flight,
                self.max_calls
            );
            return None;
        }
        counters.in_flight += 1;
        Some(BudgetReservation {
            manager: self,
            call_type: call_type.to_string(),
            committed: false,
        })
    }

    /// Returns a snapshot of current usage
    pub fn stats(&self) -> BudgetState {
        let counters = self.lock();
        let budget_used_percent = if self.max_calls > 0 {
            counters.calls_made as f64 / self.max_calls as f64 * 100.0
        } else {
            0.0
        };

        BudgetState {
            calls_made: counters.calls_made,
            max_calls: self.max_calls,
            calls_by_type: counters.calls_by_type.clone(),
            remaining_calls: self.max_calls.saturating_sub(counters.calls_made),
            budget_used_percent,
        }
    }

    /// Clears all recorded calls
    ///
    /// Outstanding reservations keep their slots.
    pub fn reset(&self) {
        let mut counters = self.lock();
        counters.calls_made = 0;
        counters.calls_by_type.clear();
        tracing::info!("Budget counters reset");
    }
}

/// A claimed budget slot awaiting the outcome of the costly call
#[must_use = "dropping a reservation releases its slot"]
#[derive(Debug)]
pub struct BudgetReservation<'a> {
    manager: &'a BudgetManager,
    call_type: String,
    committed: bool,
}

impl BudgetReservation<'_> {
    /// Converts the claimed slot into a recorded call
    pub fn commit(mut self) {
        let mut counters = self.manager.lock();
        counters.in_flight -= 1;
        counters.record(&self.call_type);
        self.committed = true;
        tracing::debug!(
            "Reserved call committed: type={}, total={}/{}",
            self.call_type,
            counters.calls_made,
            self.manager.max_calls
        );
    }
}

impl Drop for BudgetReservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let mut counters = self.manager.lock();
            counters.in_flight -= 1;
            tracing::trace!("Released unused budget slot for '{}'", self.call_type);
        }
    }
}
