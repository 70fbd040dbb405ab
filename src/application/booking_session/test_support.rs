//! Test doubles shared by the booking-session unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::booking_session::ServerEvent;
use crate::domain::foundation::{ConnectionId, DomainError, ErrorCode, ReservationId};
use crate::domain::i18n::Locale;
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::ports::{
    ClientChannel, OutboundFrame, OutboundReceiver, ReservationService, TransitionOutcome,
};

/// Records every send, broadcast and disconnect.
pub struct RecordingChannel {
    sent: Mutex<Vec<(Option<ConnectionId>, ServerEvent)>>,
    disconnected: Mutex<Vec<ConnectionId>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            disconnected: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_to(&self, connection_id: &ConnectionId) -> Vec<ServerEvent> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target.as_ref() == Some(connection_id))
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn disconnected(&self) -> Vec<ConnectionId> {
        self.disconnected.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientChannel for RecordingChannel {
    async fn send(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        self.sent
            .lock()
            .unwrap()
            .push((Some(connection_id.clone()), event));
        true
    }

    async fn broadcast(&self, event: ServerEvent) -> usize {
        self.sent.lock().unwrap().push((None, event));
        1
    }

    async fn disconnect(&self, connection_id: &ConnectionId) {
        self.disconnected.lock().unwrap().push(connection_id.clone());
    }
}

/// How the mock reservation service answers transition calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionBehavior {
    /// Apply the transition and report success.
    Apply,
    /// Report success without changing anything.
    SucceedWithoutChange,
    /// Move the reservation to this status and report success.
    MoveTo(ReservationStatus),
    /// Report failure without changing anything.
    Reject,
    /// Fail with an infrastructure error.
    Fail,
}

/// In-process reservation service with call counters.
pub struct MockReservationService {
    reservations: Mutex<HashMap<ReservationId, Reservation>>,
    behavior: Mutex<TransitionBehavior>,
    lookups: Mutex<usize>,
    transitions: Mutex<usize>,
}

impl MockReservationService {
    pub fn new() -> Self {
        Self {
            reservations: Mutex::new(HashMap::new()),
            behavior: Mutex::new(TransitionBehavior::Apply),
            lookups: Mutex::new(0),
            transitions: Mutex::new(0),
        }
    }

    pub fn with_reservation(self, id: &str, status: ReservationStatus) -> Self {
        let id = ReservationId::new(id).unwrap();
        self.reservations
            .lock()
            .unwrap()
            .insert(id.clone(), Reservation::new(id, status));
        self
    }

    pub fn with_behavior(self, behavior: TransitionBehavior) -> Self {
        *self.behavior.lock().unwrap() = behavior;
        self
    }

    pub fn status_of(&self, id: &str) -> Option<ReservationStatus> {
        let id = ReservationId::new(id).unwrap();
        self.reservations.lock().unwrap().get(&id).map(|r| r.status)
    }

    pub fn lookup_count(&self) -> usize {
        *self.lookups.lock().unwrap()
    }

    pub fn transition_count(&self) -> usize {
        *self.transitions.lock().unwrap()
    }

    fn transition(
        &self,
        id: &ReservationId,
        target: ReservationStatus,
    ) -> Result<TransitionOutcome, DomainError> {
        *self.transitions.lock().unwrap() += 1;
        let behavior = *self.behavior.lock().unwrap();
        let mut reservations = self.reservations.lock().unwrap();
        let current = reservations
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::new(ErrorCode::ReservationNotFound, "not found"))?;

        let (success, next) = match behavior {
            TransitionBehavior::Apply => match current.with_status(target) {
                Ok(next) => (true, next),
                Err(_) => (false, current),
            },
            TransitionBehavior::SucceedWithoutChange => (true, current),
            TransitionBehavior::MoveTo(status) => (
                true,
                Reservation {
                    status,
                    ..current
                },
            ),
            TransitionBehavior::Reject => (false, current),
            TransitionBehavior::Fail => {
                return Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"))
            }
        };
        reservations.insert(id.clone(), next.clone());
        Ok(TransitionOutcome {
            success,
            reservation: next,
        })
    }
}

#[async_trait]
impl ReservationService for MockReservationService {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        *self.lookups.lock().unwrap() += 1;
        Ok(self.reservations.lock().unwrap().get(id).cloned())
    }

    async fn cancel(
        &self,
        id: &ReservationId,
        _locale: Locale,
    ) -> Result<TransitionOutcome, DomainError> {
        self.transition(id, ReservationStatus::Cancelled)
    }

    async fn confirm(
        &self,
        id: &ReservationId,
        _locale: Locale,
    ) -> Result<TransitionOutcome, DomainError> {
        self.transition(id, ReservationStatus::Confirmed)
    }
}

/// Drains everything currently queued for a connection.
pub fn drain(rx: &mut OutboundReceiver) -> Vec<OutboundFrame> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

/// Only the events, in order, from drained frames.
pub fn events(frames: &[OutboundFrame]) -> Vec<ServerEvent> {
    frames
        .iter()
        .filter_map(|frame| match frame {
            OutboundFrame::Event(event) => Some(event.clone()),
            OutboundFrame::Close => None,
        })
        .collect()
}
