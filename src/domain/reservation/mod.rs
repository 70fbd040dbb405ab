//! Reservation module - the slice of the back-office reservation model the
//! booking session needs: its status lifecycle and the permission oracle.

mod permissions;
#[allow(clippy::module_inception)]
mod reservation;
mod status;

pub use permissions::PermittedActions;
pub use reservation::Reservation;
pub use status::ReservationStatus;
