//! # Fault-escalation policy for supervised children.
//!
//! [`FaultPolicy`] maps a failure class to a [`FaultAction`]. The root
//! supervisor records one policy per child and consults it whenever a
//! running child reports a failure.
//!
//! ## Rules
//! - An initialization-class failure is **always** [`FaultAction::Fatal`],
//!   at any depth, under every policy. A mis-constructed child is assumed
//!   unsafe to retry automatically.
//! - Other failures go through the chosen policy's decision procedure.
//!
//! ## Choosing the right policy
//!
//! **Ordinary children** (the default):
//! ```text
//! FaultPolicy::Default   → recoverable failure  → Resume (state preserved)
//!                        → unrecoverable        → Escalate (ultimately Fatal)
//! ```
//!
//! **Children nothing can run without**:
//! ```text
//! FaultPolicy::AlwaysFatal → any failure → Fatal
//! ```

use crate::error::ServiceError;

/// Action the supervisor takes in response to a child failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultAction {
    /// Tear the whole system down; the hosting process exits non-zero.
    Fatal,
    /// Leave the child running; its mailbox and state are untouched.
    Resume,
    /// Propagate upward; at the root this becomes [`FaultAction::Fatal`].
    Escalate,
}

/// Policy controlling how a child's runtime failures are triaged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Default decision procedure: resume recoverable failures, escalate
    /// unrecoverable ones.
    #[default]
    Default,
    /// Every failure of this child, whatever its class, is fatal.
    AlwaysFatal,
}

impl FaultPolicy {
    /// Maps a failure to the action the supervisor must take.
    ///
    /// Initialization-class failures short-circuit to [`FaultAction::Fatal`]
    /// before the per-policy procedure is consulted.
    pub fn action_for(&self, error: &ServiceError) -> FaultAction {
        if error.is_init_class() {
            return FaultAction::Fatal;
        }
        match self {
            FaultPolicy::AlwaysFatal => FaultAction::Fatal,
            FaultPolicy::Default => {
                if error.is_recoverable() {
                    FaultAction::Resume
                } else {
                    FaultAction::Escalate
                }
            }
        }
    }
}
