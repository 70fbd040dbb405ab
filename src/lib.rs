//! Hotel Booking Session - real-time payment coordination for reservations
//!
//! Clients hold a persistent websocket connection while they pay for a
//! reservation. The server keeps each connection alive with pings, makes
//! sure a reservation is paid from one connection at a time, and asks the
//! reservation back-office to confirm or cancel it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
