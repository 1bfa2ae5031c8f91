//! Route records

use std::sync::Arc;

use crate::guard::NavigationGuard;

/// Views the UI layer renders for a matched route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    SetupPage,
    AuthPage,
    SignIn,
    ChangeOtp,
    SettingsPage,
    InstanceTab,
    UsersTab,
    UserTab,
    RolesTab,
    RoleTab,
    ProjectsPage,
    NewProjectPage,
    ProjectPage,
    BoardPage,
    ProjectSettingsPage,
    ProjectSettingsProjectPage,
    ProjectSettingsBoardPage,
    ProjectSettingsUsersPage,
}

/// Where a record sends the navigation instead of rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// An absolute path
    Path(String),
    /// A named route, reusing the current params
    Named(String),
}

/// One node of the route tree.
///
/// Child paths are relative to their parent unless they start with `/`.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub view: Option<View>,
    pub redirect: Option<Redirect>,
    pub guards: Vec<Arc<dyn NavigationGuard>>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            view: None,
            redirect: None,
            guards: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect = Some(Redirect::Path(path.into()));
        self
    }

    pub fn redirect_to_named(mut self, name: impl Into<String>) -> Self {
        self.redirect = Some(Redirect::Named(name.into()));
        self
    }

    pub fn guard(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}
