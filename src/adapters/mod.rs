//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - in-process reservation service
//! - `websocket` - axum transport for the booking channel

pub mod memory;
pub mod websocket;

pub use memory::InMemoryReservationService;
pub use websocket::{booking_router, WebSocketState};
