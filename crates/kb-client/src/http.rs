//! Reqwest-backed implementation of [`ProjectsApi`]
//!
//! This adapter owns transport details only: URL building, authentication headers,
//! HTTP error mapping, and JSON decoding into domain models.

use async_trait::async_trait;
use kb_core::config::ApiConfig;
use kb_core::error::KbError;
use kb_core::result::KbResult;
use kb_core::traits::Id;
use kb_models::{
    AddProjectUser, Board, BoardFull, ChangeProjectUserRole, CreateBoard, CreateProject,
    CreateStage, MoveStage, Project, ProjectUser, Stage, UpdateBoard, UpdateProject,
};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::ProjectsApi;
use crate::paths::{self, ApiPath};

const DEFAULT_USER_AGENT: &str = concat!("kanban-client/", env!("CARGO_PKG_VERSION"));

/// Membership endpoints wrap the membership in a `users` envelope
#[derive(Debug, Deserialize)]
struct ProjectUserEnvelope {
    users: ProjectUser,
}

/// Error body shape returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<serde_json::Value>,
}

/// HTTP client for the tracker REST API
#[derive(Debug, Clone)]
pub struct HttpProjectsApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpProjectsApi {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `KbError::Config` when the base URL is invalid or the reqwest client
    /// cannot be constructed.
    pub fn new(config: &ApiConfig) -> KbResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| KbError::Config(format!("invalid API URL {:?}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(KbError::Config(format!(
                "API URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(user_agent)
            .build()
            .map_err(|e| KbError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &ApiPath) -> KbResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| KbError::Config("API URL cannot carry a path".into()))?;
            segments.pop_if_empty();
            segments.extend(path.segments());
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &ApiPath) -> KbResult<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!(method = %method, path = %path, "sending request");

        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, path: &ApiPath) -> KbResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, "request failed");
            KbError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        tracing::warn!(path = %path, status = status.as_u16(), message = %message, "request rejected");
        Err(KbError::from_status(status.as_u16(), message))
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, path: ApiPath) -> KbResult<T> {
        let builder = self.request(method, &path)?;
        let response = self.send(builder, &path).await?;
        decode(response, &path).await
    }

    async fn fetch_with<B, T>(&self, method: Method, path: ApiPath, body: &B) -> KbResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method, &path)?.json(body);
        let response = self.send(builder, &path).await?;
        decode(response, &path).await
    }

    async fn execute(&self, method: Method, path: ApiPath) -> KbResult<()> {
        let builder = self.request(method, &path)?;
        self.send(builder, &path).await.map(|_| ())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response, path: &ApiPath) -> KbResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| KbError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(path = %path, error = %e, "undecodable response");
        KbError::Decode(format!("{}: {}", path, e))
    })
}

/// Pull a human-readable message out of an error body.
///
/// The backend sends `{"message": "..."}` or, for validation failures, a list of messages.
/// Non-JSON bodies are used verbatim.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(ErrorBody {
            message: Some(serde_json::Value::String(message)),
        }) => Some(message),
        Ok(ErrorBody {
            message: Some(serde_json::Value::Array(messages)),
        }) => Some(
            messages
                .iter()
                .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl ProjectsApi for HttpProjectsApi {
    async fn list_projects(&self) -> KbResult<Vec<Project>> {
        self.fetch(Method::GET, paths::projects()).await
    }

    async fn get_project(&self, project_id: Id) -> KbResult<Project> {
        self.fetch(Method::GET, paths::project(project_id)).await
    }

    async fn create_project(&self, input: &CreateProject) -> KbResult<Project> {
        self.fetch_with(Method::POST, paths::projects(), input).await
    }

    async fn update_project(&self, project_id: Id, input: &UpdateProject) -> KbResult<Project> {
        self.fetch_with(Method::PATCH, paths::project(project_id), input)
            .await
    }

    async fn delete_project(&self, project_id: Id) -> KbResult<()> {
        self.execute(Method::DELETE, paths::project(project_id)).await
    }

    async fn create_board(&self, project_id: Id, input: &CreateBoard) -> KbResult<Board> {
        self.fetch_with(Method::POST, paths::boards(project_id), input)
            .await
    }

    async fn get_board(&self, project_id: Id, board_id: Id) -> KbResult<BoardFull> {
        self.fetch(Method::GET, paths::board(project_id, board_id))
            .await
    }

    async fn update_board(
        &self,
        project_id: Id,
        board_id: Id,
        input: &UpdateBoard,
    ) -> KbResult<Board> {
        self.fetch_with(Method::PATCH, paths::board(project_id, board_id), input)
            .await
    }

    async fn delete_board(&self, project_id: Id, board_id: Id) -> KbResult<()> {
        self.execute(Method::DELETE, paths::board(project_id, board_id))
            .await
    }

    async fn create_stage(
        &self,
        project_id: Id,
        board_id: Id,
        input: &CreateStage,
    ) -> KbResult<Stage> {
        self.fetch_with(Method::POST, paths::stages(project_id, board_id), input)
            .await
    }

    async fn delete_stage(&self, project_id: Id, board_id: Id, stage_id: Id) -> KbResult<()> {
        self.execute(Method::DELETE, paths::stage(project_id, board_id, stage_id))
            .await
    }

    async fn move_stage(
        &self,
        project_id: Id,
        board_id: Id,
        stage_id: Id,
        input: &MoveStage,
    ) -> KbResult<()> {
        let path = paths::stage_move(project_id, board_id, stage_id);
        let builder = self.request(Method::PATCH, &path)?.json(input);
        self.send(builder, &path).await.map(|_| ())
    }

    async fn add_project_user(
        &self,
        project_id: Id,
        input: &AddProjectUser,
    ) -> KbResult<ProjectUser> {
        let envelope: ProjectUserEnvelope = self
            .fetch_with(Method::PUT, paths::project_users(project_id), input)
            .await?;
        Ok(envelope.users)
    }

    async fn change_project_user_role(
        &self,
        project_id: Id,
        username: &str,
        input: &ChangeProjectUserRole,
    ) -> KbResult<ProjectUser> {
        let envelope: ProjectUserEnvelope = self
            .fetch_with(Method::PATCH, paths::project_user(project_id, username), input)
            .await?;
        Ok(envelope.users)
    }

    async fn remove_project_user(&self, project_id: Id, username: &str) -> KbResult<()> {
        self.execute(Method::DELETE, paths::project_user(project_id, username))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, patch, put};
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    #[derive(Debug, Clone)]
    struct Recorded {
        path: String,
        body: Value,
        authorization: Option<String>,
    }

    type Recorder = Arc<Mutex<Vec<Recorded>>>;

    fn record(recorder: &Recorder, path: String, body: Value, headers: &HeaderMap) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        recorder.lock().push(Recorded {
            path,
            body,
            authorization,
        });
    }

    async fn list_projects(State(recorder): State<Recorder>, headers: HeaderMap) -> Json<Value> {
        record(&recorder, "/projects".into(), Value::Null, &headers);
        Json(json!([
            { "id": 1, "name": "Apollo", "description": null, "boards": [], "users": [] },
            { "id": 2, "name": "Gemini", "description": "orbit" }
        ]))
    }

    async fn get_project(Path(id): Path<i64>) -> axum::response::Response {
        match id {
            404 => (
                StatusCode::NOT_FOUND,
                Json(json!({ "statusCode": 404, "message": "Project not found" })),
            )
                .into_response(),
            500 => (StatusCode::INTERNAL_SERVER_ERROR, "database on fire").into_response(),
            13 => (StatusCode::OK, "not json").into_response(),
            _ => Json(json!({
                "id": id,
                "name": "Apollo",
                "boards": [{ "id": 3, "name": "Main", "isDefault": true }],
                "users": [{ "user": { "username": "ada" }, "role": { "name": "Owner" } }]
            }))
            .into_response(),
        }
    }

    async fn create_project(
        State(recorder): State<Recorder>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        if body["name"] == "taken" {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": ["name must be unique", "name is reserved"] })),
            )
                .into_response();
        }
        record(&recorder, "/projects".into(), body.clone(), &headers);
        (
            StatusCode::CREATED,
            Json(json!({ "id": 10, "name": body["name"], "description": body["description"] })),
        )
            .into_response()
    }

    async fn move_stage(
        State(recorder): State<Recorder>,
        headers: HeaderMap,
        Path((project_id, board_id, stage_id)): Path<(i64, i64, i64)>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        record(
            &recorder,
            format!("/projects/{project_id}/boards/{board_id}/stages/{stage_id}/move"),
            body,
            &headers,
        );
        Json(json!({ "id": stage_id, "name": "moved", "position": 0 }))
    }

    async fn add_user(Path(_id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "users": { "user": { "id": 8, "username": body["username"] }, "role": { "name": "Member" } }
        }))
    }

    async fn change_role(
        Path((_id, username)): Path<(i64, String)>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        Json(json!({
            "users": { "user": { "username": username }, "role": { "name": body["roleName"] } }
        }))
    }

    async fn remove_user(
        State(recorder): State<Recorder>,
        headers: HeaderMap,
        Path((id, username)): Path<(i64, String)>,
    ) -> Json<Value> {
        record(
            &recorder,
            format!("/projects/{id}/users/{username}"),
            Value::Null,
            &headers,
        );
        Json(json!({ "users": { "user": { "username": username }, "role": { "name": "Member" } } }))
    }

    async fn spawn_backend() -> (String, Recorder) {
        let recorder: Recorder = Arc::default();
        let router = Router::new()
            .route("/api/projects", get(list_projects).post(create_project))
            .route("/api/projects/:id", get(get_project))
            .route(
                "/api/projects/:id/boards/:board_id/stages/:stage_id/move",
                patch(move_stage),
            )
            .route("/api/projects/:id/users", put(add_user))
            .route(
                "/api/projects/:id/users/:username",
                patch(change_role).delete(remove_user),
            )
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}/api/", addr), recorder)
    }

    fn client(base_url: &str, token: Option<&str>) -> HttpProjectsApi {
        HttpProjectsApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            token: token.map(str::to_string),
            timeout_seconds: 5,
            user_agent: None,
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpProjectsApi::new(&ApiConfig {
            base_url: "not a url".into(),
            token: None,
            timeout_seconds: 5,
            user_agent: None,
        })
        .unwrap_err();
        assert!(matches!(err, KbError::Config(_)));
    }

    #[test]
    fn test_url_joins_segments_under_base_path() {
        let api = client("http://tracker.local/api/", None);
        let url = api.url(&paths::project_user(4, "ada lovelace")).unwrap();
        assert_eq!(url.as_str(), "http://tracker.local/api/projects/4/users/ada%20lovelace");

        let api = client("http://tracker.local", None);
        let url = api.url(&paths::board(1, 2)).unwrap();
        assert_eq!(url.as_str(), "http://tracker.local/projects/1/boards/2");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            error_message(r#"{"message":["a","b"]}"#).as_deref(),
            Some("a, b")
        );
        assert_eq!(error_message("plain text").as_deref(), Some("plain text"));
        assert_eq!(error_message("   "), None);
    }

    #[tokio::test]
    async fn test_list_projects_with_bearer_token() {
        let (base, recorder) = spawn_backend().await;
        let api = client(&base, Some("s3cret"));

        let projects = api.list_projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].description.as_deref(), Some("orbit"));
        assert!(projects[1].boards.is_empty());

        let recorded = recorder.lock().clone();
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer s3cret"));
    }

    #[tokio::test]
    async fn test_get_project_decodes_nested_collections() {
        let (base, _) = spawn_backend().await;
        let api = client(&base, None);

        let project = api.get_project(5).await.unwrap();
        assert_eq!(project.id, 5);
        assert_eq!(project.default_board().map(|b| b.id), Some(3));
        assert_eq!(project.member("ada").map(|m| m.role.name.as_str()), Some("Owner"));
    }

    #[tokio::test]
    async fn test_error_statuses_are_mapped() {
        let (base, _) = spawn_backend().await;
        let api = client(&base, None);

        match api.get_project(404).await {
            Err(KbError::NotFound { message }) => assert_eq!(message, "Project not found"),
            other => panic!("unexpected result: {other:?}"),
        }
        match api.get_project(500).await {
            Err(KbError::Remote { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "database on fire");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(api.get_project(13).await, Err(KbError::Decode(_))));
    }

    #[tokio::test]
    async fn test_create_project_posts_payload() {
        let (base, recorder) = spawn_backend().await;
        let api = client(&base, None);

        let project = api
            .create_project(&CreateProject::new("Voyager").with_description("far"))
            .await
            .unwrap();
        assert_eq!(project.id, 10);
        assert_eq!(project.name, "Voyager");

        let recorded = recorder.lock().clone();
        assert_eq!(recorded[0].body, json!({ "name": "Voyager", "description": "far" }));
        assert_eq!(recorded[0].authorization, None);
    }

    #[tokio::test]
    async fn test_validation_failure_joins_messages() {
        let (base, _) = spawn_backend().await;
        let api = client(&base, None);

        match api.create_project(&CreateProject::new("taken")).await {
            Err(KbError::Validation(errors)) => assert_eq!(
                errors.base_errors,
                vec!["name must be unique, name is reserved".to_string()]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_move_stage_sends_leading_stage() {
        let (base, recorder) = spawn_backend().await;
        let api = client(&base, None);

        api.move_stage(1, 2, 3, &MoveStage::after(Some(7))).await.unwrap();
        api.move_stage(1, 2, 4, &MoveStage::after(None)).await.unwrap();

        let recorded = recorder.lock().clone();
        assert_eq!(recorded[0].path, "/projects/1/boards/2/stages/3/move");
        assert_eq!(recorded[0].body, json!({ "leadingStageId": 7 }));
        assert_eq!(recorded[1].body, json!({}));
    }

    #[tokio::test]
    async fn test_membership_envelope_is_unwrapped() {
        let (base, recorder) = spawn_backend().await;
        let api = client(&base, None);

        let added = api
            .add_project_user(1, &AddProjectUser { username: "grace".into() })
            .await
            .unwrap();
        assert_eq!(added.username(), "grace");
        assert_eq!(added.role.name, "Member");

        let changed = api
            .change_project_user_role(
                1,
                "grace",
                &ChangeProjectUserRole {
                    role_name: "Admin".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(changed.role.name, "Admin");

        api.remove_project_user(1, "grace hopper").await.unwrap();
        let recorded = recorder.lock().clone();
        assert_eq!(recorded[0].path, "/projects/1/users/grace hopper");
    }
}
