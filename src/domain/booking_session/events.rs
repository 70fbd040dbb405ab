//! Outcome events sent from the server to booking clients.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Name of a server → client event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    OnConnection,
    OnDisconnection,
    OnStartBookingPayment,
    OnCancelBookingPayment,
    OnCompleteBookingPayment,
    OnErrorBookingPayment,
    Ping,
    OnPong,
    OnNoPing,
}

/// Reason class attached to error events by the error-action handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    Cancelled,
    Warning,
    Redirect,
}

/// One event as it goes out on the wire.
///
/// `error` is omitted on success; clients treat `error: true` as
/// authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEvent {
    pub event: EventName,
    pub client_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: String,
}

impl ServerEvent {
    /// A non-error event.
    pub fn new(event: EventName, client_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event,
            client_id: client_id.into(),
            message: message.into(),
            error: None,
            reason: None,
            data: None,
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }

    /// An `error: true` event, optionally classed by `reason`.
    pub fn failure(
        event: EventName,
        client_id: impl Into<String>,
        message: impl Into<String>,
        reason: Option<ErrorReason>,
    ) -> Self {
        Self {
            error: Some(true),
            reason,
            ..Self::new(event, client_id, message)
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error == Some(true)
    }
}
