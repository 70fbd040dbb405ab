//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the booking session and the outside world. Adapters implement these ports.
//!
//! - `ReservationService` - Reservation lookup and confirm/cancel transitions
//! - `ClientChannel` - Event delivery to live client connections

mod client_channel;
mod reservation_service;

pub use client_channel::{ClientChannel, OutboundFrame, OutboundReceiver, OutboundSender};
pub use reservation_service::{ReservationService, TransitionOutcome};
