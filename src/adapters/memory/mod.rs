//! In-process adapters for local runs and tests.

mod in_memory_reservations;

pub use in_memory_reservations::InMemoryReservationService;
