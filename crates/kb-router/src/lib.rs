//! # kb-router
//!
//! Client-side routing for the kanban client.
//!
//! ## Features
//!
//! - Declarative route records with nested children and redirects
//! - Path and query parsing
//! - Route resolution (static segments outrank `:params`)
//! - `before_enter` guards, including board query preservation
//! - An in-memory [`Router`] that implements [`Navigator`]

pub mod location;
pub mod record;
pub mod guard;
pub mod matcher;
pub mod routes;
pub mod router;

pub use location::{Location, Params, Query};
pub use record::{Redirect, RouteRecord, View};
pub use guard::{GuardDecision, NavigationGuard, PreserveQuery};
pub use router::{NavigationError, NavigationTarget, Navigator, ResolvedRoute, Router};
pub use routes::{app_routes, names, BOARD_QUERY, PROJECT_ID_PARAM};
