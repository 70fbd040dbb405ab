//! Read model of a reservation as returned by the back-office.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ReservationId, StateMachine, Timestamp, ValidationError};

use super::ReservationStatus;

/// Snapshot of a reservation. The booking-session subsystem never mutates
/// one directly; statuses change only through the reservation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub status: ReservationStatus,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Reservation {
    pub fn new(id: ReservationId, status: ReservationStatus) -> Self {
        Self {
            id,
            status,
            updated_at: Timestamp::now(),
        }
    }

    /// Returns a copy moved to `target`, or an error if the edge is illegal.
    pub fn with_status(&self, target: ReservationStatus) -> Result<Self, ValidationError> {
        let status = self.status.transition_to(target)?;
        Ok(Self {
            id: self.id.clone(),
            status,
            updated_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: &str) -> Reservation {
        Reservation::new(ReservationId::new(id).unwrap(), ReservationStatus::Pending)
    }

    #[test]
    fn with_status_follows_state_machine() {
        let confirmed = pending("R1").with_status(ReservationStatus::Confirmed).unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(confirmed.id.as_str(), "R1");
    }

    #[test]
    fn with_status_rejects_illegal_edge() {
        let cancelled = pending("R1").with_status(ReservationStatus::Cancelled).unwrap();
        assert!(cancelled.with_status(ReservationStatus::Confirmed).is_err());
    }

    #[test]
    fn deserializes_without_updated_at() {
        let reservation: Reservation =
            serde_json::from_str(r#"{"id": "R9", "status": "pending"}"#).unwrap();
        assert_eq!(reservation.id.as_str(), "R9");
        assert_eq!(reservation.status, ReservationStatus::Pending);
    }
}
