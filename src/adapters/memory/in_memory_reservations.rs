//! In-memory reservation service.
//!
//! Stands in for the back-office when running locally: reservations are
//! seeded from a JSON file and transitions follow the status state machine.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ReservationId};
use crate::domain::i18n::Locale;
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::ports::{ReservationService, TransitionOutcome};

/// Reservation store held in process memory.
///
/// # Example
///
/// ```ignore
/// let service = InMemoryReservationService::from_seed_file("reservations.json")?;
/// let outcome = service.confirm(&id, Locale::En).await?;
/// ```
#[derive(Default)]
pub struct InMemoryReservationService {
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reservations(reservations: impl IntoIterator<Item = Reservation>) -> Self {
        let map = reservations
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        Self {
            reservations: RwLock::new(map),
        }
    }

    /// Loads a JSON array of `{"id", "status"}` objects.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to read seed file: {}", e))
                .with_detail("path", path.display().to_string())
        })?;
        let reservations: Vec<Reservation> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::new(ErrorCode::InvalidFormat, format!("Invalid seed file: {}", e))
                .with_detail("path", path.display().to_string())
        })?;
        tracing::info!(count = reservations.len(), path = %path.display(), "Seeded reservations");
        Ok(Self::with_reservations(reservations))
    }

    /// Inserts or replaces a reservation.
    pub async fn upsert(&self, reservation: Reservation) {
        self.reservations
            .write()
            .await
            .insert(reservation.id.clone(), reservation);
    }

    pub async fn len(&self) -> usize {
        self.reservations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reservations.read().await.is_empty()
    }

    async fn transition(
        &self,
        id: &ReservationId,
        target: ReservationStatus,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut reservations = self.reservations.write().await;
        let current = reservations.get(id).cloned().ok_or_else(|| {
            DomainError::new(ErrorCode::ReservationNotFound, "Reservation not found")
                .with_detail("reservation_id", id.as_str())
        })?;

        match current.with_status(target) {
            Ok(next) => {
                reservations.insert(id.clone(), next.clone());
                Ok(TransitionOutcome {
                    success: true,
                    reservation: next,
                })
            }
            Err(e) => {
                tracing::debug!(reservation_id = %id, %target, "Transition refused: {}", e);
                Ok(TransitionOutcome {
                    success: false,
                    reservation: current,
                })
            }
        }
    }
}

#[async_trait]
impl ReservationService for InMemoryReservationService {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        Ok(self.reservations.read().await.get(id).cloned())
    }

    async fn cancel(
        &self,
        id: &ReservationId,
        _locale: Locale,
    ) -> Result<TransitionOutcome, DomainError> {
        self.transition(id, ReservationStatus::Cancelled).await
    }

    async fn confirm(
        &self,
        id: &ReservationId,
        _locale: Locale,
    ) -> Result<TransitionOutcome, DomainError> {
        self.transition(id, ReservationStatus::Confirmed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rid(id: &str) -> ReservationId {
        ReservationId::new(id).unwrap()
    }

    fn service() -> InMemoryReservationService {
        InMemoryReservationService::with_reservations([
            Reservation::new(rid("R1"), ReservationStatus::Pending),
            Reservation::new(rid("R2"), ReservationStatus::Cancelled),
        ])
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_id() {
        assert!(service().find_by_id(&rid("R404")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn confirm_moves_pending_to_confirmed() {
        let service = service();

        let outcome = service.confirm(&rid("R1"), Locale::En).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.reservation.status, ReservationStatus::Confirmed);
        let stored = service.find_by_id(&rid("R1")).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn illegal_transition_reports_failure_and_keeps_status() {
        let service = service();

        let outcome = service.confirm(&rid("R2"), Locale::En).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.reservation.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn transition_on_unknown_id_is_an_error() {
        let err = service().cancel(&rid("R404"), Locale::Es).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn seeds_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"R1","status":"pending"}},{{"id":"R2","status":"confirmed"}}]"#
        )
        .unwrap();

        let service = InMemoryReservationService::from_seed_file(file.path()).unwrap();

        assert_eq!(service.len().await, 2);
        let r2 = service.find_by_id(&rid("R2")).await.unwrap().unwrap();
        assert_eq!(r2.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn malformed_seed_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = InMemoryReservationService::from_seed_file(file.path()).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn missing_seed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = InMemoryReservationService::from_seed_file(dir.path().join("absent.json"));
        assert!(result.is_err());
    }
}
