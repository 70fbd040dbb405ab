//! WebSocket wire protocol for the booking channel.
//!
//! - Client → Server: booking actions and liveness acks, tagged by `event`
//! - Server → Client: [`ServerEvent`] serialized as-is

use serde::Deserialize;

use crate::application::booking_session::{BookingCommand, BookingPayload};
use crate::domain::booking_session::ServerEvent;

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientMessage {
    StartBookingPayment(BookingPayload),
    CancelBookingPayment(BookingPayload),
    CompleteBookingPayment(BookingPayload),
    ErrorBookingPayment(BookingPayload),
    /// Answer to a server `ping`.
    Pong,
}

impl ClientMessage {
    /// Parses one text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl From<ClientMessage> for BookingCommand {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::StartBookingPayment(p) => BookingCommand::StartBookingPayment(p),
            ClientMessage::CancelBookingPayment(p) => BookingCommand::CancelBookingPayment(p),
            ClientMessage::CompleteBookingPayment(p) => BookingCommand::CompleteBookingPayment(p),
            ClientMessage::ErrorBookingPayment(p) => BookingCommand::ErrorBookingPayment(p),
            ClientMessage::Pong => BookingCommand::Pong,
        }
    }
}

// ============================================
// Server → Client Messages
// ============================================

/// Serializes an outbound event into a text frame body.
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}
