//! # Supervisor lifecycle state.
//!
//! [`SupervisorState`] moves strictly forward:
//!
//! ```text
//! Uninitialized ──► Initializing ──► Running
//!                        │               │
//!                        └───────────────┴──► Failed (terminal)
//! ```
//!
//! There is no recovery from `Failed` and no exit transition from `Running`
//! in this core; a failed supervisor exists only long enough for the hosting
//! process to print a diagnostic and exit.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase of the root supervisor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SupervisorState {
    /// Created, nothing built yet.
    Uninitialized = 0,
    /// Construction steps are executing in declared order.
    Initializing = 1,
    /// All children built; the only state in which they process messages.
    Running = 2,
    /// A construction step or escalated failure aborted the system. Terminal.
    Failed = 3,
}

/// Atomic cell enforcing forward-only transitions.
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(SupervisorState::Uninitialized as u8))
    }

    pub(crate) fn load(&self) -> SupervisorState {
        match self.0.load(Ordering::Acquire) {
            0 => SupervisorState::Uninitialized,
            1 => SupervisorState::Initializing,
            2 => SupervisorState::Running,
            _ => SupervisorState::Failed,
        }
    }

    /// Advances to `to` if that is a forward move; returns whether the
    /// transition happened. Backward transitions are refused, which makes
    /// `Failed` terminal by construction.
    pub(crate) fn advance(&self, to: SupervisorState) -> bool {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if to as u8 <= current {
                return false;
            }
            match self.0.compare_exchange(
                current,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}
