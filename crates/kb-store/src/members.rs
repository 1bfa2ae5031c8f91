//! Project membership actions

use kb_core::{ActionOutcome, Precondition};
use kb_models::{AddProjectUser, ChangeProjectUserRole, ProjectUser};

use crate::store::ProjectsStore;

impl ProjectsStore {
    pub async fn add_user_to_project(&self, username: &str) -> ActionOutcome<ProjectUser> {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };
        let input = AddProjectUser {
            username: username.to_string(),
        };
        if let Err(error) = Self::validate(&input) {
            return self.fail("add_user_to_project", error);
        }

        let member = match self.api.add_project_user(project.id, &input).await {
            Ok(member) => member,
            Err(error) => return self.fail("add_user_to_project", error),
        };

        self.mutate(|state| match state.project_mut(project.id) {
            Some(cached) => {
                cached.users.push(member.clone());
                true
            }
            None => false,
        });
        tracing::info!(project_id = project.id, username, role = %member.role.name, "added project member");

        ActionOutcome::Done(member)
    }

    /// Change a member's role.
    ///
    /// The backend is always asked; the cache is only touched when the member is loaded.
    pub async fn change_user_role(&self, username: &str, role: &str) -> ActionOutcome<ProjectUser> {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };
        let input = ChangeProjectUserRole {
            role_name: role.to_string(),
        };
        if let Err(error) = Self::validate(&input) {
            return self.fail("change_user_role", error);
        }

        let member = match self
            .api
            .change_project_user_role(project.id, username, &input)
            .await
        {
            Ok(member) => member,
            Err(error) => return self.fail("change_user_role", error),
        };

        let mut found = false;
        self.mutate(|state| {
            let cached = state
                .project_mut(project.id)
                .and_then(|p| p.users.iter_mut().find(|u| u.username() == username));
            if let Some(cached) = cached {
                cached.role = member.role.clone();
                found = true;
            }
            found
        });

        if !found {
            tracing::debug!(project_id = project.id, username, "role changed for a member that is not loaded");
            return Precondition::UserNotInProject.into();
        }
        ActionOutcome::Done(member)
    }

    pub async fn delete_user_from_project(&self, username: &str) -> ActionOutcome {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };

        if let Err(error) = self.api.remove_project_user(project.id, username).await {
            return self.fail("delete_user_from_project", error);
        }

        self.mutate(|state| match state.project_mut(project.id) {
            Some(cached) => {
                let before = cached.users.len();
                cached.users.retain(|u| u.username() != username);
                cached.users.len() != before
            }
            None => false,
        });
        tracing::info!(project_id = project.id, username, "removed project member");

        ActionOutcome::Done(())
    }
}
