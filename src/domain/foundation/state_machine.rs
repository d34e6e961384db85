//! State machine trait for status enums.
//!
//! Gives lifecycle enums one shape for validating transitions. Re-entering
//! the current state is treated as a no-op rather than an error so that
//! callers can retry a transition safely.

use super::{DomainError, ErrorCode};

/// Outcome of a validated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    /// The state changed from `from` to `to`.
    Changed { from: S, to: S },
    /// The target equals the current state; nothing to do.
    Unchanged(S),
}

impl<S: Copy> Transition<S> {
    /// The state after the transition.
    pub fn state(&self) -> S {
        match self {
            Transition::Changed { to, .. } => *to,
            Transition::Unchanged(s) => *s,
        }
    }

    /// True when the transition actually moved the state.
    pub fn is_change(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

/// Trait for status enums that represent state machines.
///
/// Implementors define the edges; `transition_to` is provided.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if a transition from self to a *different* target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the transition with validation.
    ///
    /// Targeting the current state yields `Transition::Unchanged`.
    fn transition_to(&self, target: Self) -> Result<Transition<Self>, DomainError> {
        if *self == target {
            return Ok(Transition::Unchanged(target));
        }
        if self.can_transition_to(&target) {
            Ok(Transition::Changed {
                from: *self,
                to: target,
            })
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}
