//! Booking session module - wire events and the error taxonomy of the
//! real-time payment flow.

mod errors;
mod events;

pub use errors::{BookingAction, BookingError, ErrorAction};
pub use events::{ErrorReason, EventName, ServerEvent};
