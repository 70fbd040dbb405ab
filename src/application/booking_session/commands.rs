//! Client-initiated booking actions, transport-independent.

use serde::{Deserialize, Serialize};

/// Fields every booking action carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// Identity the client claims; must match the sending connection.
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
}

/// One action received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingCommand {
    StartBookingPayment(BookingPayload),
    CancelBookingPayment(BookingPayload),
    CompleteBookingPayment(BookingPayload),
    ErrorBookingPayment(BookingPayload),
    /// Liveness acknowledgment for a ping.
    Pong,
}
