//! # kb-client
//!
//! Access to the tracker's REST API.
//!
//! [`ProjectsApi`] is the port the store depends on. [`HttpProjectsApi`] implements it
//! over HTTP with reqwest.

pub mod api;
pub mod paths;
pub mod http;

pub use api::ProjectsApi;
pub use http::HttpProjectsApi;
