//! State machine trait for status enums.
//!
//! Lifecycle statuses (reservations today) describe their legal edges once
//! here, and every caller asks the status instead of comparing variants.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their outgoing edges; the checked transition and the
/// terminal test come for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ReservationStatus {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Pending => vec![Confirmed, Cancelled],
///             Confirmed => vec![Completed],
///             Cancelled | Completed => vec![],
///         }
///     }
/// }
///
/// let next = ReservationStatus::Pending.transition_to(ReservationStatus::Confirmed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RoomStatus {
        Vacant,
        Occupied,
        Cleaning,
        Retired,
    }

    impl StateMachine for RoomStatus {
        fn valid_transitions(&self) -> Vec<Self> {
            use RoomStatus::*;
            match self {
                Vacant => vec![Occupied, Retired],
                Occupied => vec![Cleaning],
                Cleaning => vec![Vacant, Retired],
                Retired => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_listed_edge() {
        assert_eq!(
            RoomStatus::Vacant.transition_to(RoomStatus::Occupied),
            Ok(RoomStatus::Occupied)
        );
    }

    #[test]
    fn transition_to_fails_for_unlisted_edge() {
        assert!(RoomStatus::Occupied.transition_to(RoomStatus::Vacant).is_err());
    }

    #[test]
    fn self_transition_is_rejected_unless_listed() {
        assert!(!RoomStatus::Cleaning.can_transition_to(&RoomStatus::Cleaning));
    }

    #[test]
    fn is_terminal_only_for_states_without_edges() {
        assert!(RoomStatus::Retired.is_terminal());
        assert!(!RoomStatus::Vacant.is_terminal());
        assert!(!RoomStatus::Cleaning.is_terminal());
    }
}
