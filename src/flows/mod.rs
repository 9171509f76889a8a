//! Selection/merge dialog flows, modeled as explicit state machines.
//!
//! Each flow is a pure reducer over events; the async `load`/`save`
//! drivers issue the repository calls and feed results in as events, so
//! the transition logic stays synchronous and testable. Notifications go
//! through the injected [`crate::notify::NotificationSink`].

pub mod copy_in_user;
pub mod role_assignment;

/// What a flow does with its dialog when a load or save fails. The two
/// flows deliberately differ: role assignment stays open so the operator
/// can correct and resubmit, copy-in-user closes rather than leave a
/// half-loaded dialog on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    StayOpen,
    Close,
}

/// Result of driving a flow's save step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Save succeeded; the dialog closes.
    Saved,
    /// A local precondition failed; nothing was sent, the dialog stays open.
    Blocked,
    /// The repository call failed; `ErrorPolicy` decides what happens next.
    Failed,
}

impl SaveOutcome {
    /// Whether the dialog should close under the given policy.
    pub fn closes(&self, policy: ErrorPolicy) -> bool {
        match self {
            SaveOutcome::Saved => true,
            SaveOutcome::Blocked => false,
            SaveOutcome::Failed => policy == ErrorPolicy::Close,
        }
    }
}

/// Case-insensitive name filter used by both dialogs' option lists.
pub(crate) fn matches_filter(name: &str, filter: &str) -> bool {
    filter.trim().is_empty() || name.to_lowercase().contains(&filter.trim().to_lowercase())
}
