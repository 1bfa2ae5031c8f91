//! Project actions

use kb_core::{find_by_id_mut, ActionOutcome, Id};
use kb_models::{CreateProject, Project, UpdateProject};
use kb_router::{names, NavigationTarget, PROJECT_ID_PARAM};

use crate::sequencer::Resource;
use crate::store::ProjectsStore;

impl ProjectsStore {
    /// Replace the cached project list
    pub async fn load_projects(&self) -> ActionOutcome<Vec<Project>> {
        let ticket = self.sequencer.issue(Resource::Projects);
        let result = self.api.list_projects().await;

        if !self.sequencer.is_current(ticket) {
            return Self::superseded("load_projects", ticket);
        }
        match result {
            Ok(projects) => {
                let applied = self.apply_if_current(ticket, |state| {
                    state.projects = projects.clone();
                });
                if !applied {
                    return Self::superseded("load_projects", ticket);
                }
                tracing::debug!(count = projects.len(), "loaded projects");
                ActionOutcome::Done(projects)
            }
            Err(error) => self.fail("load_projects", error),
        }
    }

    /// Replace the cached project. A failure returns to the projects list and leaves the
    /// cache as it was.
    pub async fn load_project(&self, project_id: Id) -> ActionOutcome<Project> {
        let ticket = self.sequencer.issue_for(Resource::Project, project_id);
        let result = self.api.get_project(project_id).await;

        if !self.sequencer.is_current(ticket) {
            return Self::superseded("load_project", ticket);
        }
        match result {
            Ok(project) => {
                let applied = self.apply_if_current(ticket, |state| {
                    state.project = Some(project.clone());
                });
                if !applied {
                    return Self::superseded("load_project", ticket);
                }
                tracing::debug!(project_id, boards = project.boards.len(), "loaded project");
                ActionOutcome::Done(project)
            }
            Err(error) => self.fail_load("load_project", error),
        }
    }

    /// Create a project and open it
    pub async fn create(&self, input: CreateProject) -> ActionOutcome<Project> {
        if let Err(error) = Self::validate(&input) {
            return self.fail("create", error);
        }

        let project = match self.api.create_project(&input).await {
            Ok(project) => project,
            Err(error) => return self.fail("create", error),
        };

        self.mutate(|state| {
            state.projects.push(project.clone());
            true
        });
        tracing::info!(project_id = project.id, name = %project.name, "created project");

        self.navigate(NavigationTarget::named(names::PROJECT).with_param(PROJECT_ID_PARAM, project.id));
        ActionOutcome::Done(project)
    }

    /// Delete a project and return to the projects list
    pub async fn delete(&self, project_id: Id) -> ActionOutcome {
        if let Err(error) = self.api.delete_project(project_id).await {
            return self.fail("delete", error);
        }

        let snapshot = self.snapshot();
        let clears_project = snapshot.project_id() == Some(project_id);
        // The cached board always belongs to the cached project
        let clears_board = clears_project && snapshot.board.is_some();

        // In-flight loads of the deleted project must not bring it back
        self.sequencer.invalidate_target(Resource::Project, project_id);
        if clears_project {
            self.sequencer.invalidate(Resource::Board);
        }

        self.mutate(|state| {
            let before = state.projects.len();
            state.projects.retain(|p| p.id != project_id);
            let mut changed = state.projects.len() != before;
            if state.project_id() == Some(project_id) {
                state.project = None;
                changed = true;
            }
            if clears_board {
                state.board = None;
                changed = true;
            }
            changed
        });
        tracing::info!(project_id, "deleted project");

        self.navigate(NavigationTarget::named(names::PROJECTS));
        ActionOutcome::Done(())
    }

    /// Patch the cached project and merge the response into it
    pub async fn update(&self, input: UpdateProject) -> ActionOutcome<Project> {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };
        if let Err(error) = Self::validate(&input) {
            return self.fail("update", error);
        }

        let updated = match self.api.update_project(project.id, &input).await {
            Ok(updated) => updated,
            Err(error) => return self.fail("update", error),
        };

        // Merge into the live cache; collections changed while the request was in flight stay
        let mut merged = None;
        self.mutate(|state| {
            if let Some(summary) = find_by_id_mut(&mut state.projects, updated.id) {
                summary.name = updated.name.clone();
                summary.description = updated.description.clone();
            }
            match state.project_mut(project.id) {
                Some(cached) => {
                    cached.merge_from(updated.clone());
                    merged = Some(cached.clone());
                }
                None => tracing::debug!(project_id = project.id, "project changed during update"),
            }
            true
        });

        let merged = merged.unwrap_or_else(|| {
            let mut detached = project;
            detached.merge_from(updated);
            detached
        });
        ActionOutcome::Done(merged)
    }
}
