//! Result type aliases and the typed action outcome
//!
//! Store actions never propagate errors to their callers. They report what happened
//! through [`ActionOutcome`] instead.

use std::fmt;

use crate::error::KbError;

/// Standard Result type for client operations
pub type KbResult<T> = Result<T, KbError>;

/// A precondition an action needs that the cached state did not meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No project is loaded
    NoProject,
    /// No board is loaded
    NoBoard,
    /// The loaded project has no board flagged as default
    NoDefaultBoard,
    /// The username is not among the loaded project's members
    UserNotInProject,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Precondition::NoProject => "no project loaded",
            Precondition::NoBoard => "no board loaded",
            Precondition::NoDefaultBoard => "project has no default board",
            Precondition::UserNotInProject => "user is not a member of the loaded project",
        };
        f.write_str(text)
    }
}

/// Outcome of a store action
#[derive(Debug, Clone)]
#[must_use]
pub enum ActionOutcome<T = ()> {
    /// The action completed and the cache reflects it
    Done(T),
    /// The action did nothing because a precondition was unmet
    Skipped(Precondition),
    /// The action failed; the user has already been notified
    Failed(KbError),
    /// A newer request for the same resource was issued; this response was discarded
    Superseded,
}

impl<T> ActionOutcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, ActionOutcome::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ActionOutcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ActionOutcome::Skipped(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, ActionOutcome::Superseded)
    }

    /// The value of a completed action
    pub fn done(self) -> Option<T> {
        match self {
            ActionOutcome::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&KbError> {
        match self {
            ActionOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn skipped_because(&self) -> Option<Precondition> {
        match self {
            ActionOutcome::Skipped(precondition) => Some(*precondition),
            _ => None,
        }
    }

    /// Map the value of a completed action
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ActionOutcome<U> {
        match self {
            ActionOutcome::Done(value) => ActionOutcome::Done(f(value)),
            ActionOutcome::Skipped(precondition) => ActionOutcome::Skipped(precondition),
            ActionOutcome::Failed(err) => ActionOutcome::Failed(err),
            ActionOutcome::Superseded => ActionOutcome::Superseded,
        }
    }
}

impl<T> From<Precondition> for ActionOutcome<T> {
    fn from(precondition: Precondition) -> Self {
        ActionOutcome::Skipped(precondition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_outcome() {
        let outcome: ActionOutcome<i64> = ActionOutcome::Done(7);
        assert!(outcome.is_done());
        assert_eq!(outcome.map(|v| v * 2).done(), Some(14));
    }

    #[test]
    fn test_skipped_outcome_keeps_reason() {
        let outcome: ActionOutcome<i64> = Precondition::NoBoard.into();
        assert!(outcome.is_skipped());
        assert_eq!(outcome.skipped_because(), Some(Precondition::NoBoard));
    }

    #[test]
    fn test_failed_outcome_keeps_error() {
        let outcome: ActionOutcome = ActionOutcome::Failed(KbError::Transport("reset".into()));
        assert!(outcome.is_failed());
        assert!(matches!(outcome.error(), Some(KbError::Transport(_))));
    }
}
