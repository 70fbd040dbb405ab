//! WebSocket adapter for the booking payment channel.
//!
//! ```text
//!   client ──frames──▶ handler ──BookingCommand──▶ BookingSessionGateway
//!     ▲                                                   │
//!     └──── send task ◀── OutboundFrame ◀── HeartbeatRegistry
//! ```
//!
//! - [`messages`] - wire protocol types
//! - [`handler`] - axum upgrade handler, health probe and router

pub mod handler;
pub mod messages;

pub use handler::{booking_router, health_handler, ws_handler, ConnectParams, WebSocketState};
pub use messages::{encode_event, ClientMessage};
