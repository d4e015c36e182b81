//! Fault-escalation and resume policies.
//!
//! This module groups the knobs that control **what happens** when a
//! supervised child fails.
//!
//! ## Contents
//! - [`FaultAction`] what the supervisor does (fatal / resume / escalate)
//! - [`FaultPolicy`] per-child mapping from failure class to action
//! - [`ResumeBehavior`] named per-child choice of what a resumed child keeps
//!
//! ## Quick wiring
//! ```text
//! ChildEntry { policy: FaultPolicy, resume: ResumeBehavior }
//!      └─► Supervisor::supervise() uses:
//!           - policy.action_for(&error) to triage each failure signal
//!           - resume.as_label() on the ServiceResumed event it publishes
//! ```
//!
//! ## Defaults
//! - `FaultPolicy::Default` (resume recoverable, escalate unrecoverable).
//! - `ResumeBehavior::PreserveState` (children are actor loops; rebuilding
//!   would drop queued messages).

mod fault;
mod resume;

pub use fault::{FaultAction, FaultPolicy};
pub use resume::ResumeBehavior;
