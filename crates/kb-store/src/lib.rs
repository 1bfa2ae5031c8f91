//! # kb-store
//!
//! The kanban client's cached state and the actions that change it.
//!
//! ## Features
//!
//! - Immutable [`StoreState`] snapshots published through a `watch` channel
//! - Project, board, stage and membership actions over [`kb_client::ProjectsApi`]
//! - Typed [`ActionOutcome`](kb_core::ActionOutcome)s instead of silent no-ops
//! - Request sequencing so stale load responses never overwrite newer ones

pub mod state;
pub mod sequencer;
pub mod store;
mod projects;
mod boards;
mod members;

#[cfg(test)]
mod testing;

pub use state::StoreState;
pub use sequencer::{RequestSequencer, Resource, Ticket};
pub use store::ProjectsStore;
