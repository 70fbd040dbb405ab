//! Application layer - use cases that coordinate the domain and the ports.

pub mod booking_session;

pub use booking_session::{
    BookingCommand, BookingPayload, BookingSessionGateway, ErrorActionRegistry, HeartbeatConfig,
    HeartbeatRegistry, HeartbeatStatus,
};
