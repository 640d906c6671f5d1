//! Booking status state machine.
//!
//! Both mutation paths (synchronous confirmation and asynchronous webhook)
//! converge on `BookingState`, so the legal transitions live in exactly one
//! place. The state is the `(status, payment_status)` pair; transitions on
//! one field alone are not meaningful.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Settlement status of the payment attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Composite booking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingState {
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

impl BookingState {
    pub const fn new(status: BookingStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status,
            payment_status,
        }
    }

    /// Initial state of every booking.
    pub const fn pending_unpaid() -> Self {
        Self::new(BookingStatus::Pending, PaymentStatus::Unpaid)
    }

    /// State after a successful synchronous verification.
    pub const fn confirmed_succeeded() -> Self {
        Self::new(BookingStatus::Confirmed, PaymentStatus::Succeeded)
    }

    /// State after a payment failure notification. Status is forced back to
    /// pending, never cancelled or confirmed, so the user can retry payment.
    pub const fn pending_failed() -> Self {
        Self::new(BookingStatus::Pending, PaymentStatus::Failed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

impl StateMachine for BookingState {
    fn can_transition_to(&self, target: &Self) -> bool {
        // Cancelled is terminal.
        if self.is_cancelled() {
            return false;
        }

        // Any live state may be cancelled; cancellation keeps the payment
        // status it found.
        if target.status == BookingStatus::Cancelled {
            return target.payment_status == self.payment_status;
        }

        match (*self, *target) {
            // Synchronous confirmation at creation time.
            (s, t) if s == Self::pending_unpaid() && t == Self::confirmed_succeeded() => true,
            // Failure webhook; the self-loop makes re-delivery a legal no-op.
            (s, t) if t == Self::pending_failed() => {
                s.status == BookingStatus::Pending || s.status == BookingStatus::Confirmed
            }
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        if self.is_cancelled() {
            return vec![];
        }

        let mut targets = vec![
            Self::pending_failed(),
            Self::new(BookingStatus::Cancelled, self.payment_status),
        ];
        if *self == Self::pending_unpaid() {
            targets.insert(0, Self::confirmed_succeeded());
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> Vec<BookingState> {
        let statuses = [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ];
        let payments = [
            PaymentStatus::Unpaid,
            PaymentStatus::Succeeded,
            PaymentStatus::Failed,
        ];
        statuses
            .iter()
            .flat_map(|s| payments.iter().map(|p| BookingState::new(*s, *p)))
            .collect()
    }

    // ══════════════════════════════════════════════════════════════
    // Confirmation Transition
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn pending_unpaid_may_confirm() {
        assert!(BookingState::pending_unpaid()
            .can_transition_to(&BookingState::confirmed_succeeded()));
    }

    #[test]
    fn only_pending_unpaid_may_confirm() {
        for state in all_states() {
            if state == BookingState::pending_unpaid() {
                continue;
            }
            assert!(
                !state.can_transition_to(&BookingState::confirmed_succeeded()),
                "{:?} must not confirm",
                state
            );
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Failure Transition
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn confirmed_succeeded_may_fail_back_to_pending() {
        assert!(BookingState::confirmed_succeeded()
            .can_transition_to(&BookingState::pending_failed()));
    }

    #[test]
    fn pending_unpaid_may_fail() {
        assert!(BookingState::pending_unpaid().can_transition_to(&BookingState::pending_failed()));
    }

    #[test]
    fn failure_transition_is_a_legal_self_loop() {
        assert!(BookingState::pending_failed().can_transition_to(&BookingState::pending_failed()));
    }

    #[test]
    fn cancelled_never_fails_back_to_pending() {
        for payment in [
            PaymentStatus::Unpaid,
            PaymentStatus::Succeeded,
            PaymentStatus::Failed,
        ] {
            let state = BookingState::new(BookingStatus::Cancelled, payment);
            assert!(!state.can_transition_to(&BookingState::pending_failed()));
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Cancellation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn any_live_state_may_cancel_keeping_payment_status() {
        for state in all_states() {
            if state.is_cancelled() {
                continue;
            }
            let target = BookingState::new(BookingStatus::Cancelled, state.payment_status);
            assert!(state.can_transition_to(&target), "{:?} must cancel", state);
        }
    }

    #[test]
    fn cancellation_must_not_rewrite_payment_status() {
        let state = BookingState::confirmed_succeeded();
        let target = BookingState::new(BookingStatus::Cancelled, PaymentStatus::Unpaid);
        assert!(!state.can_transition_to(&target));
    }

    #[test]
    fn cancelled_is_terminal() {
        for payment in [
            PaymentStatus::Unpaid,
            PaymentStatus::Succeeded,
            PaymentStatus::Failed,
        ] {
            let state = BookingState::new(BookingStatus::Cancelled, payment);
            assert!(state.is_terminal());
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in all_states() {
            for target in state.valid_transitions() {
                assert!(
                    state.can_transition_to(&target),
                    "{:?} -> {:?} listed but rejected",
                    state,
                    target
                );
            }
            for target in all_states() {
                if state.can_transition_to(&target) {
                    assert!(
                        state.valid_transitions().contains(&target),
                        "{:?} -> {:?} accepted but unlisted",
                        state,
                        target
                    );
                }
            }
        }
    }
}
