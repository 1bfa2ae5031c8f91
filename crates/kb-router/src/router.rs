//! Route resolution and the in-memory router

use kb_core::Id;
use parking_lot::RwLock;

use crate::guard::GuardDecision;
use crate::location::{Location, Params, Query};
use crate::matcher::{CompiledRoute, RouteId, RouteTable};
use crate::record::{Redirect, RouteRecord, View};
use crate::routes::app_routes;

/// Redirects (record or guard) allowed in one navigation
pub const MAX_REDIRECTS: usize = 10;

/// Navigation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Unknown route name: {0}")]
    UnknownRoute(String),

    #[error("Route {route} requires the {param} parameter")]
    MissingParam { route: String, param: String },

    #[error("Navigation to {0} redirected too many times")]
    TooManyRedirects(String),

    #[error("Navigation to {0} was aborted")]
    Aborted(String),

    #[error("Duplicate route name: {0}")]
    DuplicateName(String),
}

/// Where to navigate
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationTarget {
    /// A path, optionally with a query string
    Path(String),
    /// A named route; params missing here are taken from the current route
    Named {
        name: String,
        params: Params,
        query: Query,
    },
    /// A parsed location
    Location(Location),
    /// The current path with a new query
    Query(Query),
}

impl NavigationTarget {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: Params::new(),
            query: Query::new(),
        }
    }

    pub fn query(query: Query) -> Self {
        Self::Query(query)
    }

    /// Add a route param. Only named targets carry params.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        if let Self::Named { params, .. } = &mut self {
            params.insert(key.into(), value.to_string());
        }
        self
    }

    pub fn with_query(self, key: impl Into<String>, value: impl ToString) -> Self {
        let (key, value) = (key.into(), value.to_string());
        match self {
            Self::Path(path) => Self::Location(Location::parse(&path).with_query(key, value)),
            Self::Location(location) => Self::Location(location.with_query(key, value)),
            Self::Named {
                name,
                params,
                mut query,
            } => {
                query.insert(key, value);
                Self::Named { name, params, query }
            }
            Self::Query(mut query) => {
                query.insert(key, value);
                Self::Query(query)
            }
        }
    }
}

/// The outcome of resolving a target against the route table
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub location: Location,
    pub name: Option<String>,
    pub params: Params,
    /// Matched record ids, root first
    pub matched: Vec<RouteId>,
    /// Views of the matched chain, outermost first
    pub views: Vec<View>,
    pub redirected_from: Option<Location>,
}

impl ResolvedRoute {
    /// The route before any navigation happened
    pub fn start() -> Self {
        Self::at(Location::default())
    }

    /// An unmatched route at a location
    pub fn at(location: Location) -> Self {
        Self {
            location,
            name: None,
            params: Params::new(),
            matched: Vec::new(),
            views: Vec::new(),
            redirected_from: None,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn param_id(&self, key: &str) -> Option<Id> {
        self.param(key).and_then(|v| v.parse().ok())
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// The navigation collaborator used by the store
pub trait Navigator: Send + Sync {
    fn current(&self) -> ResolvedRoute;

    fn navigate(&self, target: NavigationTarget) -> Result<ResolvedRoute, NavigationError>;
}

#[derive(Debug)]
struct RouterState {
    current: ResolvedRoute,
    history: Vec<Location>,
}

/// In-memory router over a compiled route table
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    state: RwLock<RouterState>,
}

impl Router {
    pub fn new(records: Vec<RouteRecord>) -> Result<Self, NavigationError> {
        Ok(Self {
            table: RouteTable::compile(records)?,
            state: RwLock::new(RouterState {
                current: ResolvedRoute::start(),
                history: Vec::new(),
            }),
        })
    }

    /// A router over the application's route table
    pub fn app() -> Result<Self, NavigationError> {
        Self::new(app_routes())
    }

    /// Visited locations, oldest first
    pub fn history(&self) -> Vec<Location> {
        self.state.read().history.clone()
    }

    /// Resolve a target against the current route without running guards
    pub fn resolve(&self, target: &NavigationTarget) -> Result<ResolvedRoute, NavigationError> {
        let from = self.current();
        let mut redirects = 0;
        self.resolve_from(target, &from, &mut redirects)
    }

    fn resolve_from(
        &self,
        target: &NavigationTarget,
        from: &ResolvedRoute,
        redirects: &mut usize,
    ) -> Result<ResolvedRoute, NavigationError> {
        let location = self.target_location(target, from)?;
        let original = location.clone();
        let mut resolved = self.match_location(location)?;

        while let Some(redirect) = self.leaf(&resolved).and_then(|r| r.redirect.clone()) {
            *redirects += 1;
            if *redirects > MAX_REDIRECTS {
                return Err(NavigationError::TooManyRedirects(original.to_string()));
            }

            let mut next = match redirect {
                Redirect::Path(path) => Location::parse(&path),
                Redirect::Named(name) => {
                    let route = self.named(&name)?;
                    Location::new(&self.table.build_path(route, &resolved.params)?)
                }
            };
            for (key, value) in &resolved.location.query {
                next.query.entry(key.clone()).or_insert_with(|| value.clone());
            }

            tracing::trace!(from = %resolved.location, to = %next, "following route redirect");
            resolved = self.match_location(next)?;
            resolved.redirected_from = Some(original.clone());
        }

        Ok(resolved)
    }

    fn target_location(
        &self,
        target: &NavigationTarget,
        from: &ResolvedRoute,
    ) -> Result<Location, NavigationError> {
        match target {
            NavigationTarget::Path(path) => Ok(Location::parse(path)),
            NavigationTarget::Location(location) => Ok(location.clone()),
            NavigationTarget::Query(query) => Ok(Location {
                path: from.location.path.clone(),
                query: query.clone(),
            }),
            NavigationTarget::Named {
                name,
                params,
                query,
            } => {
                let route = self.named(name)?;
                let mut merged = from.params.clone();
                merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
                let merged = self.table.params_for(route, &merged);
                Ok(Location {
                    path: self.table.build_path(route, &merged)?,
                    query: query.clone(),
                })
            }
        }
    }

    fn named(&self, name: &str) -> Result<&CompiledRoute, NavigationError> {
        self.table
            .by_name(name)
            .ok_or_else(|| NavigationError::UnknownRoute(name.to_string()))
    }

    fn leaf(&self, route: &ResolvedRoute) -> Option<&CompiledRoute> {
        route.matched.last().and_then(|id| self.table.get(*id))
    }

    fn match_location(&self, location: Location) -> Result<ResolvedRoute, NavigationError> {
        let (route, params) = self
            .table
            .match_path(&location.path)
            .ok_or_else(|| NavigationError::NotFound(location.to_string()))?;

        let matched = self.table.chain(route.id);
        let views = matched
            .iter()
            .filter_map(|id| self.table.get(*id).and_then(|r| r.view))
            .collect();

        tracing::trace!(location = %location, route = ?route.name, "resolved route");

        Ok(ResolvedRoute {
            location,
            name: route.name.clone(),
            params,
            matched,
            views,
            redirected_from: None,
        })
    }

    fn run_guards(&self, to: &ResolvedRoute, from: &ResolvedRoute) -> GuardDecision {
        let entered = to.matched.iter().filter(|id| !from.matched.contains(id));
        for route in entered.filter_map(|id| self.table.get(*id)) {
            for guard in &route.guards {
                match guard.before_enter(to, from) {
                    GuardDecision::Proceed => {}
                    decision => return decision,
                }
            }
        }
        GuardDecision::Proceed
    }
}

impl Navigator for Router {
    fn current(&self) -> ResolvedRoute {
        self.state.read().current.clone()
    }

    fn navigate(&self, target: NavigationTarget) -> Result<ResolvedRoute, NavigationError> {
        let from = self.current();
        let mut redirects = 0;
        let mut target = target;

        loop {
            let to = self.resolve_from(&target, &from, &mut redirects)?;
            match self.run_guards(&to, &from) {
                GuardDecision::Proceed => {
                    tracing::debug!(from = %from.location, to = %to.location, "navigated");
                    let mut state = self.state.write();
                    state.history.push(to.location.clone());
                    state.current = to.clone();
                    return Ok(to);
                }
                GuardDecision::Redirect(next) => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(NavigationError::TooManyRedirects(to.location.to_string()));
                    }
                    target = next;
                }
                GuardDecision::Abort => {
                    tracing::debug!(to = %to.location, "navigation aborted by guard");
                    return Err(NavigationError::Aborted(to.location.to_string()));
                }
            }
        }
    }
}
