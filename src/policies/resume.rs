//! # Resume behavior for children that survive a runtime failure.
//!
//! When the decision procedure resolves a failure to
//! [`FaultAction::Resume`](crate::policies::FaultAction::Resume), what happens
//! to the child's internal state is an explicit, named choice recorded in the
//! supervisor's child table, not an implicit framework default. The chosen
//! label is published with every `ServiceResumed` event so the behavior is
//! auditable from the outside.

/// What a resumed child does with the state it accumulated before failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResumeBehavior {
    /// The child keeps its mailbox and internal state and simply continues
    /// processing. The right choice for actor loops whose queued messages
    /// must not be dropped.
    #[default]
    PreserveState,
    /// The child is reconstructed from scratch on resume, discarding prior
    /// state. Only suitable for stateless children; declaring it is a table
    /// entry, so switching a child over never touches the triage logic.
    Rebuild,
}

impl ResumeBehavior {
    /// Returns a short stable label (snake_case) for logs and events.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResumeBehavior::PreserveState => "preserve_state",
            ResumeBehavior::Rebuild => "rebuild",
        }
    }
}
