//! Static message catalog keyed by [`MessageKey`] and [`Locale`].
//!
//! Every user-visible string the booking-session subsystem emits comes from
//! here. Lookups are pure; the catalog is built once on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::Locale;

/// Identifies one user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Connected,
    Disconnected,
    Ping,
    ConnectionUnstable,
    ConnectionLost,
    InvalidClientId,
    MissingReservationId,
    ReservationNotFound,
    ReservationLocked,
    CannotConfirm,
    CannotCancel,
    PaymentStarted,
    PaymentCancelled,
    PaymentCompleted,
    PaymentErrorReported,
    UpdateException,
    UnexpectedStatus,
    TransitionRejected,
    ServiceUnavailable,
}

impl MessageKey {
    /// Every key, in declaration order.
    pub const ALL: [MessageKey; 19] = [
        MessageKey::Connected,
        MessageKey::Disconnected,
        MessageKey::Ping,
        MessageKey::ConnectionUnstable,
        MessageKey::ConnectionLost,
        MessageKey::InvalidClientId,
        MessageKey::MissingReservationId,
        MessageKey::ReservationNotFound,
        MessageKey::ReservationLocked,
        MessageKey::CannotConfirm,
        MessageKey::CannotCancel,
        MessageKey::PaymentStarted,
        MessageKey::PaymentCancelled,
        MessageKey::PaymentCompleted,
        MessageKey::PaymentErrorReported,
        MessageKey::UpdateException,
        MessageKey::UnexpectedStatus,
        MessageKey::TransitionRejected,
        MessageKey::ServiceUnavailable,
    ];
}

const ENGLISH: &[(MessageKey, &str)] = &[
    (MessageKey::Connected, "Connection established"),
    (MessageKey::Disconnected, "Connection closed"),
    (MessageKey::Ping, "ping"),
    (
        MessageKey::ConnectionUnstable,
        "The connection is unstable, please check your network",
    ),
    (
        MessageKey::ConnectionLost,
        "The connection was lost and the booking session has been released",
    ),
    (MessageKey::InvalidClientId, "Invalid client identity"),
    (MessageKey::MissingReservationId, "Missing reservation id"),
    (MessageKey::ReservationNotFound, "No reservation found"),
    (
        MessageKey::ReservationLocked,
        "This reservation is being paid in another session",
    ),
    (
        MessageKey::CannotConfirm,
        "The reservation cannot be confirmed in its current status",
    ),
    (
        MessageKey::CannotCancel,
        "The reservation cannot be cancelled in its current status",
    ),
    (MessageKey::PaymentStarted, "Booking payment started"),
    (MessageKey::PaymentCancelled, "Booking payment cancelled"),
    (MessageKey::PaymentCompleted, "Booking payment completed"),
    (
        MessageKey::PaymentErrorReported,
        "An error occurred during the booking payment",
    ),
    (
        MessageKey::UpdateException,
        "The reservation status did not change",
    ),
    (
        MessageKey::UnexpectedStatus,
        "The reservation ended in an unexpected status",
    ),
    (
        MessageKey::TransitionRejected,
        "The reservation update was rejected",
    ),
    (
        MessageKey::ServiceUnavailable,
        "The reservation service is unavailable, please try again",
    ),
];

const SPANISH: &[(MessageKey, &str)] = &[
    (MessageKey::Connected, "Conexión establecida"),
    (MessageKey::Disconnected, "Conexión cerrada"),
    (MessageKey::Ping, "ping"),
    (
        MessageKey::ConnectionUnstable,
        "La conexión es inestable, por favor revise su red",
    ),
    (
        MessageKey::ConnectionLost,
        "Se perdió la conexión y la sesión de reserva fue liberada",
    ),
    (MessageKey::InvalidClientId, "Identidad de cliente inválida"),
    (MessageKey::MissingReservationId, "Falta el id de la reserva"),
    (MessageKey::ReservationNotFound, "No se encontró la reserva"),
    (
        MessageKey::ReservationLocked,
        "Esta reserva se está pagando en otra sesión",
    ),
    (
        MessageKey::CannotConfirm,
        "La reserva no puede confirmarse en su estado actual",
    ),
    (
        MessageKey::CannotCancel,
        "La reserva no puede cancelarse en su estado actual",
    ),
    (MessageKey::PaymentStarted, "Pago de reserva iniciado"),
    (MessageKey::PaymentCancelled, "Pago de reserva cancelado"),
    (MessageKey::PaymentCompleted, "Pago de reserva completado"),
    (
        MessageKey::PaymentErrorReported,
        "Ocurrió un error durante el pago de la reserva",
    ),
    (
        MessageKey::UpdateException,
        "El estado de la reserva no cambió",
    ),
    (
        MessageKey::UnexpectedStatus,
        "La reserva terminó en un estado inesperado",
    ),
    (
        MessageKey::TransitionRejected,
        "La actualización de la reserva fue rechazada",
    ),
    (
        MessageKey::ServiceUnavailable,
        "El servicio de reservas no está disponible, intente nuevamente",
    ),
];

static CATALOG: Lazy<HashMap<Locale, HashMap<MessageKey, &'static str>>> = Lazy::new(|| {
    let mut catalog = HashMap::new();
    catalog.insert(Locale::En, ENGLISH.iter().copied().collect());
    catalog.insert(Locale::Es, SPANISH.iter().copied().collect());
    catalog
});

/// Returns the message for `key` in `locale`.
///
/// Falls back to English when a locale lacks the key.
pub fn translate(locale: Locale, key: MessageKey) -> &'static str {
    CATALOG
        .get(&locale)
        .and_then(|messages| messages.get(&key))
        .or_else(|| CATALOG.get(&Locale::En).and_then(|m| m.get(&key)))
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_a_message_in_every_locale() {
        for locale in [Locale::En, Locale::Es] {
            let messages = CATALOG.get(&locale).unwrap();
            for key in MessageKey::ALL {
                assert!(
                    messages.get(&key).is_some_and(|m| !m.is_empty()),
                    "{:?} missing in {:?}",
                    key,
                    locale
                );
            }
        }
    }

    #[test]
    fn translate_picks_locale() {
        assert_eq!(
            translate(Locale::En, MessageKey::MissingReservationId),
            "Missing reservation id"
        );
        assert_eq!(
            translate(Locale::Es, MessageKey::MissingReservationId),
            "Falta el id de la reserva"
        );
    }

    #[test]
    fn catalogs_have_no_duplicate_entries() {
        assert_eq!(ENGLISH.len(), MessageKey::ALL.len());
        assert_eq!(SPANISH.len(), MessageKey::ALL.len());
    }
}
