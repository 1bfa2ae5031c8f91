//! The projects store
//!
//! Holds the project list, the loaded project and the loaded board. Every action reports
//! backend failures to the user through the [`Notifier`] and returns an [`ActionOutcome`];
//! nothing is propagated as an error.

use std::sync::Arc;

use kb_client::ProjectsApi;
use kb_core::{ActionOutcome, Id, KbError, Precondition};
use kb_models::{BoardFull, Project};
use kb_notifications::{Notifier, Toast};
use kb_router::{names, NavigationTarget, Navigator};
use tokio::sync::watch;
use validator::Validate;

use crate::sequencer::{RequestSequencer, Ticket};
use crate::state::StoreState;

pub struct ProjectsStore {
    pub(crate) api: Arc<dyn ProjectsApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Arc<StoreState>>,
    pub(crate) sequencer: RequestSequencer,
}

impl ProjectsStore {
    pub fn new(
        api: Arc<dyn ProjectsApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(StoreState::default()));
        Self {
            api,
            notifier,
            navigator,
            state,
            sequencer: RequestSequencer::new(),
        }
    }

    /// The current state. Later actions never change a snapshot already handed out.
    pub fn snapshot(&self) -> Arc<StoreState> {
        self.state.borrow().clone()
    }

    /// A receiver notified after every change
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreState>> {
        self.state.subscribe()
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Apply `f` to a copy-on-write state; subscribers are woken when it returns `true`
    pub(crate) fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut StoreState) -> bool,
    {
        self.state.send_if_modified(|state| f(Arc::make_mut(state)))
    }

    /// Apply `f` only when `ticket` is still the latest for its resource.
    ///
    /// The check and the write happen under the channel's lock, so a newer response
    /// applied first can never be overwritten.
    pub(crate) fn apply_if_current<F>(&self, ticket: Ticket, f: F) -> bool
    where
        F: FnOnce(&mut StoreState),
    {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            applied = self.sequencer.is_current(ticket);
            if applied {
                f(Arc::make_mut(state));
            }
            applied
        });
        applied
    }

    pub(crate) fn require_project(&self) -> Result<Project, Precondition> {
        self.snapshot().project.clone().ok_or(Precondition::NoProject)
    }

    pub(crate) fn require_board(&self) -> Result<(Id, BoardFull), Precondition> {
        let snapshot = self.snapshot();
        let project_id = snapshot.project_id().ok_or(Precondition::NoProject)?;
        let board = snapshot.board.clone().ok_or(Precondition::NoBoard)?;
        Ok((project_id, board))
    }

    pub(crate) fn validate<V: Validate>(input: &V) -> Result<(), KbError> {
        input.validate().map_err(KbError::from)
    }

    /// Report a failed action to the user
    pub(crate) fn fail<T>(&self, action: &'static str, error: KbError) -> ActionOutcome<T> {
        tracing::warn!(
            action,
            status = ?error.status_code(),
            code = error.error_code(),
            error = %error,
            "store action failed"
        );
        self.notifier.notify(Toast::from(&error));
        ActionOutcome::Failed(error)
    }

    /// Report a failed load and return to the projects list
    pub(crate) fn fail_load<T>(&self, action: &'static str, error: KbError) -> ActionOutcome<T> {
        let outcome = self.fail(action, error);
        self.navigate(NavigationTarget::named(names::PROJECTS));
        outcome
    }

    pub(crate) fn superseded<T>(action: &'static str, ticket: Ticket) -> ActionOutcome<T> {
        tracing::debug!(action, seq = ticket.seq(), "discarding superseded response");
        ActionOutcome::Superseded
    }

    /// Navigate, logging failures; actions never fail because of navigation
    pub(crate) fn navigate(&self, target: NavigationTarget) {
        if let Err(error) = self.navigator.navigate(target) {
            tracing::warn!(error = %error, "navigation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, Fixture};

    #[test]
    fn test_snapshots_are_immutable() {
        let Fixture { store, .. } = fixture();
        let before = store.snapshot();

        store.mutate(|state| {
            state.projects.push(Project::new(1, "Apollo"));
            true
        });

        assert!(before.projects.is_empty());
        assert_eq!(store.snapshot().projects.len(), 1);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let Fixture { store, .. } = fixture();
        let mut receiver = store.subscribe();

        store.mutate(|_| false);
        assert!(!receiver.has_changed().unwrap());

        store.mutate(|state| {
            state.project = Some(Project::new(3, "Gemini"));
            true
        });
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().project_id(), Some(3));
    }

    #[test]
    fn test_stale_ticket_is_not_applied() {
        let Fixture { store, .. } = fixture();
        let stale = store.sequencer.issue(crate::Resource::Project);
        let fresh = store.sequencer.issue(crate::Resource::Project);

        assert!(!store.apply_if_current(stale, |state| state.project = Some(Project::new(1, "old"))));
        assert!(store.apply_if_current(fresh, |state| state.project = Some(Project::new(2, "new"))));
        assert_eq!(store.snapshot().project_id(), Some(2));
    }

    #[test]
    fn test_preconditions() {
        let Fixture { store, .. } = fixture();
        assert_eq!(store.require_project().unwrap_err(), Precondition::NoProject);
        assert_eq!(store.require_board().unwrap_err(), Precondition::NoProject);

        store.mutate(|state| {
            state.project = Some(Project::new(1, "Apollo"));
            true
        });
        assert_eq!(store.require_board().unwrap_err(), Precondition::NoBoard);
    }
}
