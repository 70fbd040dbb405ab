//! Permission oracle: which booking actions a reservation status allows.
//!
//! Callers never compare statuses themselves; they ask for the permission
//! set every time an action arrives.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

use super::ReservationStatus;

/// Actions a client may currently take on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PermittedActions {
    pub can_confirm: bool,
    pub can_cancel: bool,
    pub can_complete: bool,
}

impl PermittedActions {
    /// Derives the permission set for `status`. Total over every status;
    /// terminal statuses yield all-false.
    pub fn for_status(status: ReservationStatus) -> Self {
        Self {
            can_confirm: status.can_transition_to(&ReservationStatus::Confirmed),
            can_cancel: status.can_transition_to(&ReservationStatus::Cancelled),
            can_complete: status.can_transition_to(&ReservationStatus::Completed),
        }
    }

    /// True when nothing is allowed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ReservationStatus> for PermittedActions {
    fn from(status: ReservationStatus) -> Self {
        Self::for_status(status)
    }
}
