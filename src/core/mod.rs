//! Runtime core: bootstrap, supervision, and lifecycle.
//!
//! The only functional entry point is [`Supervisor`], which constructs the
//! service topology and triages failures.
//!
//! Internal modules:
//! - [`supervisor`]: fail-fast bootstrap and the fault-triage loop;
//! - [`children`]: child table rows, node names, failure signaling;
//! - [`state`]: forward-only lifecycle state machine.

mod children;
mod state;
mod supervisor;

pub use children::node;
pub use children::{ChildEntry, FailureSignal, FailureSink};
pub use state::SupervisorState;
pub use supervisor::{OperatorMessage, Supervisor, SupervisorHandle, SystemDeps};
