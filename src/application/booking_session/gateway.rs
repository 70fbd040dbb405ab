//! BookingSessionGateway - orchestrates the real-time payment flow.
//!
//! Every booking action goes through the same steps:
//! 1. Basic validation (identity, reservation id, existence)
//! 2. Permission check against the reservation status oracle
//! 3. Reservation lock, taken only once the action is permitted
//! 4. Transition call on the reservation service (cancel/complete only)
//! 5. Authoritative re-read of the status before any success is emitted
//!
//! Failures never escape a handler: they are surfaced on the action's own
//! outcome event through the error-action registry.

use std::sync::Arc;

use serde_json::json;

use crate::domain::booking_session::{BookingAction, BookingError, EventName, ServerEvent};
use crate::domain::foundation::{ConnectionId, ReservationId};
use crate::domain::i18n::{translate, Locale, MessageKey};
use crate::domain::reservation::{PermittedActions, Reservation, ReservationStatus};
use crate::ports::{ClientChannel, OutboundSender, ReservationService};

use super::{BookingCommand, BookingPayload, HeartbeatRegistry};

/// Fails with `UpdateException` when a transition left the status as it was.
pub fn verify_status_change(
    before: ReservationStatus,
    after: ReservationStatus,
) -> Result<(), BookingError> {
    if before == after {
        return Err(BookingError::UpdateException { status: after });
    }
    Ok(())
}

/// Entry point for connection events and client booking actions.
pub struct BookingSessionGateway {
    registry: HeartbeatRegistry,
    reservations: Arc<dyn ReservationService>,
    payment_time_limit_secs: u64,
}

impl BookingSessionGateway {
    pub fn new(
        registry: HeartbeatRegistry,
        reservations: Arc<dyn ReservationService>,
        payment_time_limit_secs: u64,
    ) -> Self {
        Self {
            registry,
            reservations,
            payment_time_limit_secs,
        }
    }

    pub fn registry(&self) -> &HeartbeatRegistry {
        &self.registry
    }

    /// Registers a new connection and announces it.
    ///
    /// A reservation requested at connect time is locked right away; if
    /// another connection holds it the client is redirected.
    pub async fn handle_connection(
        &self,
        connection_id: ConnectionId,
        sender: OutboundSender,
        reservation_id: Option<String>,
        locale: Option<String>,
    ) {
        let locale = Locale::resolve(locale.as_deref(), self.registry.config().default_locale);
        let reservation_id = reservation_id.and_then(|id| ReservationId::new(id).ok());

        let locked = self
            .registry
            .add_connection(connection_id.clone(), sender, reservation_id.clone(), Some(locale))
            .await;

        tracing::info!(
            connection_id = %connection_id,
            reservation_id = ?reservation_id,
            "Client connected"
        );
        self.registry
            .broadcast(ServerEvent::new(
                EventName::OnConnection,
                connection_id.as_str(),
                translate(locale, MessageKey::Connected),
            ))
            .await;

        if let (false, Some(reservation_id)) = (locked, reservation_id) {
            self.report(
                BookingError::ReservationLocked(reservation_id),
                EventName::OnConnection,
                &connection_id,
                locale,
            )
            .await;
        }
    }

    /// Releases the connection and announces it. Safe on every disconnect
    /// path, including after a forced drop.
    pub async fn handle_disconnect(&self, connection_id: &ConnectionId) {
        let locale = self
            .registry
            .connection_locale(connection_id)
            .await
            .unwrap_or(self.registry.config().default_locale);
        let removed = self.registry.remove_connection(connection_id).await;

        tracing::info!(connection_id = %connection_id, removed, "Client disconnected");
        self.registry
            .broadcast(ServerEvent::new(
                EventName::OnDisconnection,
                connection_id.as_str(),
                translate(locale, MessageKey::Disconnected),
            ))
            .await;
    }

    /// Routes a client action to its handler.
    pub async fn handle_command(&self, connection_id: &ConnectionId, command: BookingCommand) {
        match command {
            BookingCommand::StartBookingPayment(payload) => {
                self.start_booking_payment(connection_id, payload).await
            }
            BookingCommand::CancelBookingPayment(payload) => {
                self.cancel_booking_payment(connection_id, payload).await
            }
            BookingCommand::CompleteBookingPayment(payload) => {
                self.complete_booking_payment(connection_id, payload).await
            }
            BookingCommand::ErrorBookingPayment(payload) => {
                self.error_booking_payment(connection_id, payload).await
            }
            BookingCommand::Pong => {
                if !self.registry.update_last_ping(connection_id).await {
                    tracing::debug!(
                        connection_id = %connection_id,
                        "Pong from unknown connection"
                    );
                }
            }
        }
    }

    /// Opens the payment window if the reservation can still be confirmed.
    pub async fn start_booking_payment(
        &self,
        connection_id: &ConnectionId,
        payload: BookingPayload,
    ) {
        let event = EventName::OnStartBookingPayment;
        let locale = self.locale_for(connection_id, &payload).await;

        let result = async {
            let reservation = self
                .execute_basic_validation(connection_id, &payload)
                .await?;
            let permitted = self
                .authorize(connection_id, &reservation, BookingAction::Confirm)
                .await?;
            Ok::<_, BookingError>((reservation, permitted))
        }
        .await;

        match result {
            Ok((reservation, permitted)) => {
                let data = json!({
                    "clientId": payload.client_id,
                    "reservationId": reservation.id,
                    "locale": locale,
                    "status": reservation.status,
                    "permittedActions": permitted,
                    "timeLimit": self.payment_time_limit_secs,
                });
                self.announce(event, connection_id, locale, MessageKey::PaymentStarted, data)
                    .await;
            }
            Err(err) => self.report(err, event, connection_id, locale).await,
        }
    }

    /// Cancels the reservation and confirms it really ended up cancelled.
    pub async fn cancel_booking_payment(
        &self,
        connection_id: &ConnectionId,
        payload: BookingPayload,
    ) {
        let event = EventName::OnCancelBookingPayment;
        let locale = self.locale_for(connection_id, &payload).await;

        let result = self
            .transition(connection_id, &payload, locale, BookingAction::Cancel)
            .await;

        match result {
            Ok(reservation) => {
                let data = json!({
                    "clientId": payload.client_id,
                    "reservationId": reservation.id,
                    "status": reservation.status,
                });
                self.announce(event, connection_id, locale, MessageKey::PaymentCancelled, data)
                    .await;
            }
            Err(err) => self.report(err, event, connection_id, locale).await,
        }
    }

    /// Confirms the reservation and checks it really ended up confirmed.
    pub async fn complete_booking_payment(
        &self,
        connection_id: &ConnectionId,
        payload: BookingPayload,
    ) {
        let event = EventName::OnCompleteBookingPayment;
        let locale = self.locale_for(connection_id, &payload).await;

        let result = self
            .transition(connection_id, &payload, locale, BookingAction::Confirm)
            .await;

        match result {
            Ok(reservation) => {
                let data = json!({
                    "clientId": payload.client_id,
                    "reservationId": reservation.id,
                    "locale": locale,
                    "status": reservation.status,
                });
                self.announce(event, connection_id, locale, MessageKey::PaymentCompleted, data)
                    .await;
            }
            Err(err) => self.report(err, event, connection_id, locale).await,
        }
    }

    /// Re-broadcasts an error the client hit on its side. Only the
    /// connection identity is checked; no collaborator is contacted.
    pub async fn error_booking_payment(
        &self,
        connection_id: &ConnectionId,
        payload: BookingPayload,
    ) {
        let event = EventName::OnErrorBookingPayment;
        let locale = self.locale_for(connection_id, &payload).await;

        if let Err(err) = check_identity(connection_id, &payload) {
            self.report(err, event, connection_id, locale).await;
            return;
        }

        tracing::info!(
            connection_id = %connection_id,
            reservation_id = ?payload.reservation_id,
            "Client reported a booking payment error"
        );
        let failure = ServerEvent::failure(
            event,
            connection_id.as_str(),
            translate(locale, MessageKey::PaymentErrorReported),
            None,
        )
        .with_data(json!({
            "clientId": payload.client_id,
            "reservationId": payload.reservation_id,
            "locale": payload.locale,
        }));
        self.registry.broadcast(failure).await;
    }

    /// Shared precondition of every reservation-bound action.
    ///
    /// Checks, in order: claimed identity matches the sender, a reservation
    /// id is present, and the reservation exists. Touches no lock.
    pub async fn execute_basic_validation(
        &self,
        connection_id: &ConnectionId,
        payload: &BookingPayload,
    ) -> Result<Reservation, BookingError> {
        check_identity(connection_id, payload)?;

        let reservation_id = payload
            .reservation_id
            .as_deref()
            .and_then(|id| ReservationId::new(id).ok())
            .ok_or(BookingError::MissingReservationId)?;

        let reservation = self
            .reservations
            .find_by_id(&reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound(reservation_id))?;

        Ok(reservation)
    }

    /// Asks the oracle whether `action` is allowed right now, then locks
    /// the reservation for this connection. A refused action leaves every
    /// lock as it was.
    async fn authorize(
        &self,
        connection_id: &ConnectionId,
        reservation: &Reservation,
        action: BookingAction,
    ) -> Result<PermittedActions, BookingError> {
        let permitted = require(reservation, action)?;
        if !self
            .registry
            .register_reservation(connection_id, &reservation.id)
            .await
        {
            return Err(BookingError::ReservationLocked(reservation.id.clone()));
        }
        Ok(permitted)
    }

    async fn transition(
        &self,
        connection_id: &ConnectionId,
        payload: &BookingPayload,
        locale: Locale,
        action: BookingAction,
    ) -> Result<Reservation, BookingError> {
        let before = self.execute_basic_validation(connection_id, payload).await?;
        self.authorize(connection_id, &before, action).await?;

        let (outcome, expected) = match action {
            BookingAction::Cancel => (
                self.reservations.cancel(&before.id, locale).await?,
                ReservationStatus::Cancelled,
            ),
            BookingAction::Confirm => (
                self.reservations.confirm(&before.id, locale).await?,
                ReservationStatus::Confirmed,
            ),
        };
        if !outcome.success {
            return Err(BookingError::TransitionRejected(before.id));
        }

        // Other connections may have acted while the call was pending.
        let after = self
            .reservations
            .find_by_id(&before.id)
            .await?
            .ok_or_else(|| BookingError::ReservationNotFound(before.id.clone()))?;

        if after.status != outcome.reservation.status {
            tracing::warn!(
                reservation_id = %after.id,
                reported = %outcome.reservation.status,
                actual = %after.status,
                "Reservation service reported a status the re-read does not show"
            );
        }

        verify_status_change(before.status, after.status)?;
        if after.status != expected {
            return Err(BookingError::UnexpectedStatus {
                expected,
                actual: after.status,
            });
        }
        Ok(after)
    }

    async fn locale_for(&self, connection_id: &ConnectionId, payload: &BookingPayload) -> Locale {
        let fallback = self
            .registry
            .connection_locale(connection_id)
            .await
            .unwrap_or(self.registry.config().default_locale);
        Locale::resolve(payload.locale.as_deref(), fallback)
    }

    async fn announce(
        &self,
        event: EventName,
        connection_id: &ConnectionId,
        locale: Locale,
        key: MessageKey,
        data: serde_json::Value,
    ) {
        let outcome = ServerEvent::new(event, connection_id.as_str(), translate(locale, key))
            .with_data(data);
        self.registry.broadcast(outcome).await;
    }

    async fn report(
        &self,
        error: BookingError,
        event: EventName,
        connection_id: &ConnectionId,
        locale: Locale,
    ) {
        let code = error.code();
        match &error {
            BookingError::Infrastructure(_)
            | BookingError::TransitionRejected(_)
            | BookingError::UpdateException { .. }
            | BookingError::UnexpectedStatus { .. } => tracing::warn!(
                connection_id = %connection_id,
                ?event,
                %code,
                %error,
                "Booking action failed"
            ),
            _ => tracing::info!(
                connection_id = %connection_id,
                ?event,
                %code,
                %error,
                "Booking action rejected"
            ),
        }
        self.registry
            .error_actions()
            .report(&error, event, connection_id, locale, &self.registry)
            .await;
    }
}

fn check_identity(
    connection_id: &ConnectionId,
    payload: &BookingPayload,
) -> Result<(), BookingError> {
    if payload.client_id != connection_id.as_str() {
        return Err(BookingError::InvalidClientId);
    }
    Ok(())
}

fn require(
    reservation: &Reservation,
    action: BookingAction,
) -> Result<PermittedActions, BookingError> {
    let permitted = PermittedActions::for_status(reservation.status);
    let allowed = match action {
        BookingAction::Confirm => permitted.can_confirm,
        BookingAction::Cancel => permitted.can_cancel,
    };
    if !allowed {
        return Err(BookingError::ActionNotPermitted {
            action,
            status: reservation.status,
        });
    }
    Ok(permitted)
}
