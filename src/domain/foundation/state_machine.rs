//! State machine trait for lifecycle statuses.
//!
//! Provides a single place where legal transitions are declared and
//! validated, so every mutation path goes through the same rules.

use thiserror::Error;

/// A transition that the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot transition from {from} to {to}")]
pub struct IllegalTransition {
    pub from: String,
    pub to: String,
}

/// Trait for statuses that form a state machine.
///
/// Implementors declare the valid transitions and get a validated
/// `transition_to` for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if the transition from self to target is legal.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all legal target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the transition, failing if it is not legal.
    fn transition_to(&self, target: Self) -> Result<Self, IllegalTransition> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(IllegalTransition {
                from: format!("{:?}", self),
                to: format!("{:?}", target),
            })
        }
    }

    /// Checks if the current state has no outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Draft,
        Active,
        Closed,
    }

    impl StateMachine for TestStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TestStatus::*;
            matches!((self, target), (Draft, Active) | (Active, Closed))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TestStatus::*;
            match self {
                Draft => vec![Active],
                Active => vec![Closed],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            TestStatus::Draft.transition_to(TestStatus::Active),
            Ok(TestStatus::Active)
        );
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let err = TestStatus::Draft.transition_to(TestStatus::Closed).unwrap_err();
        assert_eq!(err.from, "Draft");
        assert_eq!(err.to, "Closed");
    }

    #[test]
    fn is_terminal_matches_valid_transitions() {
        assert!(TestStatus::Closed.is_terminal());
        assert!(!TestStatus::Draft.is_terminal());
    }
}
