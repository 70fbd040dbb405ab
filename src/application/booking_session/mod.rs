//! Booking session - real-time payment coordination over persistent
//! client connections.
//!
//! - [`HeartbeatRegistry`] owns connections, liveness timers and
//!   reservation locks
//! - [`ErrorActionRegistry`] maps tagged failures to channel reactions
//! - [`BookingSessionGateway`] validates and executes client actions

mod commands;
mod error_actions;
mod gateway;
mod heartbeat;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::{BookingCommand, BookingPayload};
pub use error_actions::{
    CancelHandler, ErrorActionHandler, ErrorActionRegistry, ErrorContext, NotifyHandler,
    RedirectHandler,
};
pub use gateway::{verify_status_change, BookingSessionGateway};
pub use heartbeat::{HeartbeatConfig, HeartbeatRegistry, HeartbeatStatus};
