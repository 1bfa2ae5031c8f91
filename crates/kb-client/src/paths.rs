//! REST path builders
//!
//! Paths are kept as segment lists so the HTTP layer can percent-encode each segment
//! (usernames may contain reserved characters).

use kb_core::traits::Id;

/// A REST resource path, relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    fn root(segment: &str) -> Self {
        Self {
            segments: vec![segment.to_string()],
        }
    }

    fn push(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ApiPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

pub fn projects() -> ApiPath {
    ApiPath::root("projects")
}

pub fn project(project_id: Id) -> ApiPath {
    projects().push(project_id)
}

pub fn boards(project_id: Id) -> ApiPath {
    project(project_id).push("boards")
}

pub fn board(project_id: Id, board_id: Id) -> ApiPath {
    boards(project_id).push(board_id)
}

pub fn stages(project_id: Id, board_id: Id) -> ApiPath {
    board(project_id, board_id).push("stages")
}

pub fn stage(project_id: Id, board_id: Id, stage_id: Id) -> ApiPath {
    stages(project_id, board_id).push(stage_id)
}

pub fn stage_move(project_id: Id, board_id: Id, stage_id: Id) -> ApiPath {
    stage(project_id, board_id, stage_id).push("move")
}

pub fn project_users(project_id: Id) -> ApiPath {
    project(project_id).push("users")
}

pub fn project_user(project_id: Id, username: &str) -> ApiPath {
    project_users(project_id).push(username)
}
