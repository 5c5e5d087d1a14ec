//! Pure bidirectional mapping between canonical run statuses and tracker
//! state names.

use super::TrackerStateNames;
use crate::mapping::domain::RunStatus;

/// Side-effect-free translator between canonical statuses and the tracker's
/// configured state names.
///
/// Used on the outbound path to recognize the ready state, and on the
/// inbound path to pick the tracker state a status write-back should apply.
/// Validity is guaranteed by construction: [`TrackerStateNames`] rejects
/// colliding names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMapper {
    names: TrackerStateNames,
}

impl StateMapper {
    /// Creates a mapper over validated tracker state names.
    #[must_use]
    pub const fn new(names: TrackerStateNames) -> Self {
        Self { names }
    }

    /// Returns whether the given tracker state name is the configured
    /// trigger state.
    #[must_use]
    pub fn is_ready_state(&self, state_name: &str) -> bool {
        self.names.ready() == state_name
    }

    /// Returns the tracker state name to apply for a canonical status.
    ///
    /// Failed and cancelled runs carry no automatic tracker state; the
    /// tracker issue is left where it is and only annotated.
    #[must_use]
    pub fn tracker_state_for(&self, status: RunStatus) -> Option<&str> {
        match status {
            RunStatus::Queued | RunStatus::Running => Some(self.names.in_progress()),
            RunStatus::Success => Some(self.names.review()),
            RunStatus::Failed | RunStatus::Cancelled => None,
        }
    }

    /// Returns the canonical status a tracker state name corresponds to.
    ///
    /// Only the in-progress and review names have canonical counterparts;
    /// the ready name is a trigger, not a status.
    #[must_use]
    pub fn status_for_tracker_state(&self, state_name: &str) -> Option<RunStatus> {
        if state_name == self.names.in_progress() {
            return Some(RunStatus::Running);
        }
        if state_name == self.names.review() {
            return Some(RunStatus::Success);
        }
        None
    }

    /// Returns the underlying state names.
    #[must_use]
    pub const fn names(&self) -> &TrackerStateNames {
        &self.names
    }
}
