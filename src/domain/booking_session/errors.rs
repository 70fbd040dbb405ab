//! Booking-session error types.
//!
//! Each error knows which [`ErrorAction`] (if any) decides how the channel
//! reacts to it, and which dictionary message the client sees.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ReservationId};
use crate::domain::i18n::MessageKey;
use crate::domain::reservation::ReservationStatus;

use super::ErrorReason;

/// How the channel reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorAction {
    /// Emit the error, then force-disconnect the connection.
    Cancel,
    /// Emit the error as a recoverable warning.
    Notify,
    /// Emit the error and expect the client to navigate away.
    Redirect,
}

impl ErrorAction {
    pub fn reason(&self) -> ErrorReason {
        match self {
            ErrorAction::Cancel => ErrorReason::Cancelled,
            ErrorAction::Notify => ErrorReason::Warning,
            ErrorAction::Redirect => ErrorReason::Redirect,
        }
    }
}

/// Transition a client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Cancel,
}

/// Everything that can go wrong while handling a booking-session message
/// or a heartbeat check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("claimed client identity does not match the connection")]
    InvalidClientId,

    #[error("reservation id is missing")]
    MissingReservationId,

    #[error("reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error("reservation {0} is held by another connection")]
    ReservationLocked(ReservationId),

    #[error("{action:?} not permitted while reservation is {status}")]
    ActionNotPermitted {
        action: BookingAction,
        status: ReservationStatus,
    },

    #[error("reservation status stayed {status} after update")]
    UpdateException { status: ReservationStatus },

    #[error("expected reservation status {expected}, found {actual}")]
    UnexpectedStatus {
        expected: ReservationStatus,
        actual: ReservationStatus,
    },

    #[error("reservation service rejected the update of {0}")]
    TransitionRejected(ReservationId),

    #[error("no pong received within the warning threshold")]
    ConnectionUnstable,

    #[error("no pong received within the fatal threshold")]
    ConnectionLost,

    #[error("reservation service failure: {0}")]
    Infrastructure(String),
}

impl BookingError {
    /// The action tag that decides the channel reaction. `None` means the
    /// error is surfaced as a plain failure event with no side effects.
    pub fn action(&self) -> Option<ErrorAction> {
        match self {
            BookingError::ReservationLocked(_) => Some(ErrorAction::Redirect),
            BookingError::ConnectionUnstable => Some(ErrorAction::Notify),
            BookingError::ConnectionLost => Some(ErrorAction::Cancel),
            _ => None,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            BookingError::InvalidClientId => MessageKey::InvalidClientId,
            BookingError::MissingReservationId => MessageKey::MissingReservationId,
            BookingError::ReservationNotFound(_) => MessageKey::ReservationNotFound,
            BookingError::ReservationLocked(_) => MessageKey::ReservationLocked,
            BookingError::ActionNotPermitted {
                action: BookingAction::Confirm,
                ..
            } => MessageKey::CannotConfirm,
            BookingError::ActionNotPermitted {
                action: BookingAction::Cancel,
                ..
            } => MessageKey::CannotCancel,
            BookingError::UpdateException { .. } => MessageKey::UpdateException,
            BookingError::UnexpectedStatus { .. } => MessageKey::UnexpectedStatus,
            BookingError::TransitionRejected(_) => MessageKey::TransitionRejected,
            BookingError::ConnectionUnstable => MessageKey::ConnectionUnstable,
            BookingError::ConnectionLost => MessageKey::ConnectionLost,
            BookingError::Infrastructure(_) => MessageKey::ServiceUnavailable,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::InvalidClientId => ErrorCode::ValidationFailed,
            BookingError::MissingReservationId => ErrorCode::EmptyField,
            BookingError::ReservationNotFound(_) => ErrorCode::ReservationNotFound,
            BookingError::ReservationLocked(_) => ErrorCode::ReservationLocked,
            BookingError::ActionNotPermitted { .. }
            | BookingError::UpdateException { .. }
            | BookingError::UnexpectedStatus { .. }
            | BookingError::TransitionRejected(_) => ErrorCode::InvalidStateTransition,
            BookingError::ConnectionUnstable | BookingError::ConnectionLost => {
                ErrorCode::ConnectionNotFound
            }
            BookingError::Infrastructure(_) => ErrorCode::UpstreamUnavailable,
        }
    }
}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        BookingError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid() -> ReservationId {
        ReservationId::new("R1").unwrap()
    }

    #[test]
    fn only_lock_and_heartbeat_errors_are_tagged() {
        assert_eq!(
            BookingError::ReservationLocked(rid()).action(),
            Some(ErrorAction::Redirect)
        );
        assert_eq!(
            BookingError::ConnectionUnstable.action(),
            Some(ErrorAction::Notify)
        );
        assert_eq!(BookingError::ConnectionLost.action(), Some(ErrorAction::Cancel));

        assert_eq!(BookingError::InvalidClientId.action(), None);
        assert_eq!(BookingError::ReservationNotFound(rid()).action(), None);
        assert_eq!(
            BookingError::UpdateException {
                status: ReservationStatus::Pending
            }
            .action(),
            None
        );
    }

    #[test]
    fn action_not_permitted_picks_message_by_action() {
        let confirm = BookingError::ActionNotPermitted {
            action: BookingAction::Confirm,
            status: ReservationStatus::Cancelled,
        };
        let cancel = BookingError::ActionNotPermitted {
            action: BookingAction::Cancel,
            status: ReservationStatus::Cancelled,
        };
        assert_eq!(confirm.message_key(), MessageKey::CannotConfirm);
        assert_eq!(cancel.message_key(), MessageKey::CannotCancel);
    }

    #[test]
    fn action_maps_to_reason() {
        assert_eq!(ErrorAction::Cancel.reason(), ErrorReason::Cancelled);
        assert_eq!(ErrorAction::Notify.reason(), ErrorReason::Warning);
        assert_eq!(ErrorAction::Redirect.reason(), ErrorReason::Redirect);
    }

    #[test]
    fn domain_error_becomes_infrastructure() {
        let err: BookingError = DomainError::new(ErrorCode::DatabaseError, "timeout").into();
        assert!(matches!(err, BookingError::Infrastructure(_)));
        assert_eq!(err.message_key(), MessageKey::ServiceUnavailable);
    }

    #[test]
    fn display_includes_statuses() {
        let err = BookingError::UnexpectedStatus {
            expected: ReservationStatus::Cancelled,
            actual: ReservationStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "expected reservation status cancelled, found pending"
        );
    }
}
