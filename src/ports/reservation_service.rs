//! ReservationService port - the back-office reservation collaborator.
//!
//! The booking session never touches reservation storage. It looks
//! reservations up and asks for confirm/cancel transitions through this
//! port, then re-reads the status to see what actually happened.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReservationId};
use crate::domain::i18n::Locale;
use crate::domain::reservation::Reservation;

/// What a transition call reports. `success` alone is not trusted; callers
/// re-read the reservation afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub success: bool,
    pub reservation: Reservation,
}

/// Port for reading and transitioning reservations.
///
/// # Example
///
/// ```ignore
/// let before = service.find_by_id(&id).await?.ok_or(NotFound)?;
/// let outcome = service.cancel(&id, Locale::En).await?;
/// let after = service.find_by_id(&id).await?; // authoritative read
/// ```
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Looks a reservation up. `Ok(None)` when it does not exist.
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError>;

    /// Requests the transition to the cancelled status.
    async fn cancel(
        &self,
        id: &ReservationId,
        locale: Locale,
    ) -> Result<TransitionOutcome, DomainError>;

    /// Requests the transition to the confirmed status.
    async fn confirm(
        &self,
        id: &ReservationId,
        locale: Locale,
    ) -> Result<TransitionOutcome, DomainError>;
}
