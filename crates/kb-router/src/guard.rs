//! Navigation guards

use std::fmt;

use crate::router::{NavigationTarget, ResolvedRoute};

/// What a guard decides about a pending navigation
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Continue to the resolved route
    Proceed,
    /// Start over with a different target
    Redirect(NavigationTarget),
    /// Cancel the navigation; the current route stays
    Abort,
}

/// Runs before a route record is entered.
///
/// A record counts as entered when it is in the target's matched chain but not in the
/// current route's chain, so query-only changes on the same route skip guards.
pub trait NavigationGuard: Send + Sync + fmt::Debug {
    fn before_enter(&self, to: &ResolvedRoute, from: &ResolvedRoute) -> GuardDecision;
}

/// Carries a query parameter from the current route into targets that lack it.
///
/// Switching between project tabs keeps the selected `board` this way.
#[derive(Debug, Clone)]
pub struct PreserveQuery {
    key: String,
}

impl PreserveQuery {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl NavigationGuard for PreserveQuery {
    fn before_enter(&self, to: &ResolvedRoute, from: &ResolvedRoute) -> GuardDecision {
        let carried = from.location.query_value(&self.key);
        let present = to.location.query_value(&self.key);

        match (carried, present) {
            (Some(value), None) => {
                tracing::trace!(key = %self.key, value, to = %to.location, "carrying query parameter");
                GuardDecision::Redirect(NavigationTarget::Location(
                    to.location.clone().with_query(self.key.clone(), value),
                ))
            }
            _ => GuardDecision::Proceed,
        }
    }
}
