//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `booking_session` - Wire events and errors of the real-time payment flow
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `i18n` - Locales and the static message dictionary
//! - `reservation` - Reservation status lifecycle and the permission oracle

pub mod booking_session;
pub mod foundation;
pub mod i18n;
pub mod reservation;
