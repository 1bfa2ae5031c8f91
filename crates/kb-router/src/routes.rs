//! The kanban client's route table

use std::sync::Arc;

use crate::guard::PreserveQuery;
use crate::record::{RouteRecord, View};

/// Query parameter holding the selected board id
pub const BOARD_QUERY: &str = "board";

/// Route parameter holding the project id
pub const PROJECT_ID_PARAM: &str = "projectId";

/// Route names
pub mod names {
    pub const HOME: &str = "home";
    pub const SETUP: &str = "setup";
    pub const AUTH: &str = "auth";
    pub const CHANGE_OTP: &str = "change-otp";
    pub const SETTINGS: &str = "settings";
    pub const USERS: &str = "users";
    pub const USER: &str = "user";
    pub const ROLES: &str = "roles";
    pub const ROLE: &str = "role";
    pub const PROJECTS: &str = "projects";
    pub const NEW_PROJECT: &str = "new-project";
    pub const PROJECT: &str = "project";
    pub const PROJECT_BOARD: &str = "project-board";
    pub const PROJECT_SETTINGS: &str = "project-settings";
    pub const PROJECT_SETTINGS_PROJECT: &str = "project-settings-project";
    pub const PROJECT_SETTINGS_BOARD: &str = "project-settings-board";
    pub const PROJECT_SETTINGS_USERS: &str = "project-settings-users";
}

fn keep_board() -> Arc<PreserveQuery> {
    Arc::new(PreserveQuery::new(BOARD_QUERY))
}

pub fn app_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/").named(names::HOME).redirect_to("/projects"),
        RouteRecord::new("/setup")
            .named(names::SETUP)
            .view(View::SetupPage),
        RouteRecord::new("/auth")
            .named(names::AUTH)
            .view(View::AuthPage)
            .redirect_to("/auth/sign-in")
            .children(vec![
                RouteRecord::new("sign-in").view(View::SignIn),
                RouteRecord::new("change-otp")
                    .named(names::CHANGE_OTP)
                    .view(View::ChangeOtp),
            ]),
        RouteRecord::new("/settings")
            .named(names::SETTINGS)
            .view(View::SettingsPage)
            .redirect_to("/settings/instance")
            .children(vec![
                RouteRecord::new("instance").view(View::InstanceTab),
                RouteRecord::new("users").named(names::USERS).view(View::UsersTab),
                RouteRecord::new("users/:username")
                    .named(names::USER)
                    .view(View::UserTab),
                RouteRecord::new("roles").named(names::ROLES).view(View::RolesTab),
                RouteRecord::new("roles/:roleName")
                    .named(names::ROLE)
                    .view(View::RoleTab),
            ]),
        RouteRecord::new("/projects")
            .named(names::PROJECTS)
            .view(View::ProjectsPage),
        RouteRecord::new("/projects/new")
            .named(names::NEW_PROJECT)
            .view(View::NewProjectPage),
        RouteRecord::new("/projects/:projectId")
            .named(names::PROJECT)
            .view(View::ProjectPage)
            .children(vec![
                RouteRecord::new("")
                    .named(names::PROJECT_BOARD)
                    .view(View::BoardPage)
                    .guard(keep_board()),
                RouteRecord::new("settings")
                    .named(names::PROJECT_SETTINGS)
                    .view(View::ProjectSettingsPage)
                    .redirect_to_named(names::PROJECT_SETTINGS_PROJECT)
                    .guard(keep_board())
                    .children(vec![
                        RouteRecord::new("project")
                            .named(names::PROJECT_SETTINGS_PROJECT)
                            .view(View::ProjectSettingsProjectPage)
                            .guard(keep_board()),
                        RouteRecord::new("board")
                            .named(names::PROJECT_SETTINGS_BOARD)
                            .view(View::ProjectSettingsBoardPage)
                            .guard(keep_board()),
                        RouteRecord::new("users")
                            .named(names::PROJECT_SETTINGS_USERS)
                            .view(View::ProjectSettingsUsersPage)
                            .guard(keep_board()),
                    ]),
            ]),
    ]
}
