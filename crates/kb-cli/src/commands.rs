//! Subcommands

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use kb_core::config::{AppConfig, LogFormat};
use kb_core::{ActionOutcome, Id};
use kb_models::{
    BoardDetails, CreateBoard, CreateProject, CreateStage, ProjectDetails, UpdateBoard,
    UpdateProject,
};
use kb_router::{NavigationTarget, Navigator, Router};
use kb_store::ProjectsStore;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(version, about = "Command-line client for the kanban tracker")]
pub struct Cli {
    /// Backend base URL (overrides KANBAN_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides KANBAN_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List all projects
    Projects,
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
    Stage {
        #[command(subcommand)]
        command: StageCommand,
    },
    Member {
        #[command(subcommand)]
        command: MemberCommand,
    },
    /// Resolve a client route and print where it lands
    Route {
        path: String,
        /// Resolve as a navigation away from this path
        #[arg(long)]
        from: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    Show {
        project_id: Id,
    },
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a project's name or description; only changed fields are sent
    Update {
        project_id: Id,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    Delete {
        project_id: Id,
    },
}

#[derive(Subcommand)]
pub enum BoardCommand {
    /// Show a board with its stages (the default board when no id is given)
    Show {
        project_id: Id,
        board_id: Option<Id>,
    },
    Create {
        project_id: Id,
        name: String,
    },
    Rename {
        project_id: Id,
        board_id: Id,
        name: String,
    },
    Delete {
        project_id: Id,
        board_id: Id,
    },
}

#[derive(Subcommand)]
pub enum StageCommand {
    Add {
        project_id: Id,
        board_id: Id,
        name: String,
    },
    Remove {
        project_id: Id,
        board_id: Id,
        stage_id: Id,
    },
    /// Place a stage after another one, or first without --after
    Move {
        project_id: Id,
        board_id: Id,
        stage_id: Id,
        #[arg(long)]
        after: Option<Id>,
    },
}

#[derive(Subcommand)]
pub enum MemberCommand {
    Add {
        project_id: Id,
        username: String,
    },
    Role {
        project_id: Id,
        username: String,
        role: String,
    },
    Remove {
        project_id: Id,
        username: String,
    },
}

pub async fn run(store: &ProjectsStore, command: Command) -> Result<()> {
    match command {
        Command::Projects => finish(store.load_projects().await),
        Command::Project { command } => project(store, command).await,
        Command::Board { command } => board(store, command).await,
        Command::Stage { command } => stage(store, command).await,
        Command::Member { command } => member(store, command).await,
        Command::Route { .. } => bail!("routes are resolved without the store"),
    }
}

async fn project(store: &ProjectsStore, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Show { project_id } => finish(store.load_project(project_id).await),
        ProjectCommand::Create { name, description } => {
            let mut input = CreateProject::new(name);
            input.description = description;
            finish(store.create(input).await)
        }
        ProjectCommand::Update {
            project_id,
            name,
            description,
            clear_description,
        } => {
            let loaded = open_project(store, project_id).await?;
            let original = ProjectDetails::from(&loaded);
            let modified = ProjectDetails {
                name: name.unwrap_or_else(|| original.name.clone()),
                description: match (description, clear_description) {
                    (_, true) => None,
                    (Some(description), false) => Some(description),
                    (None, false) => original.description.clone(),
                },
            };

            let patch = UpdateProject::between(&original, &modified)?;
            if patch.is_empty() {
                println!("nothing to change");
                return Ok(());
            }
            finish(store.update(patch).await)
        }
        ProjectCommand::Delete { project_id } => finish(store.delete(project_id).await),
    }
}

async fn board(store: &ProjectsStore, command: BoardCommand) -> Result<()> {
    match command {
        BoardCommand::Show {
            project_id,
            board_id,
        } => {
            open_project(store, project_id).await?;
            finish(store.load_board(board_id).await)
        }
        BoardCommand::Create { project_id, name } => {
            open_project(store, project_id).await?;
            finish(store.create_board(CreateBoard::new(name)).await)
        }
        BoardCommand::Rename {
            project_id,
            board_id,
            name,
        } => {
            let loaded = open_board(store, project_id, board_id).await?;
            let original = BoardDetails::from(&loaded.board);
            let patch = UpdateBoard::between(&original, &BoardDetails { name })?;
            if patch.is_empty() {
                println!("nothing to change");
                return Ok(());
            }
            finish(store.update_board(patch).await)
        }
        BoardCommand::Delete {
            project_id,
            board_id,
        } => {
            open_project(store, project_id).await?;
            finish(store.delete_board(board_id).await)
        }
    }
}

async fn stage(store: &ProjectsStore, command: StageCommand) -> Result<()> {
    match command {
        StageCommand::Add {
            project_id,
            board_id,
            name,
        } => {
            open_board(store, project_id, board_id).await?;
            finish(store.create_stage(CreateStage::new(name)).await)
        }
        StageCommand::Remove {
            project_id,
            board_id,
            stage_id,
        } => {
            open_board(store, project_id, board_id).await?;
            finish(store.delete_stage(stage_id).await)
        }
        StageCommand::Move {
            project_id,
            board_id,
            stage_id,
            after,
        } => {
            open_board(store, project_id, board_id).await?;
            finish(store.move_stage(stage_id, after).await)
        }
    }
}

async fn member(store: &ProjectsStore, command: MemberCommand) -> Result<()> {
    match command {
        MemberCommand::Add {
            project_id,
            username,
        } => {
            open_project(store, project_id).await?;
            finish(store.add_user_to_project(&username).await)
        }
        MemberCommand::Role {
            project_id,
            username,
            role,
        } => {
            open_project(store, project_id).await?;
            finish(store.change_user_role(&username, &role).await)
        }
        MemberCommand::Remove {
            project_id,
            username,
        } => {
            open_project(store, project_id).await?;
            finish(store.delete_user_from_project(&username).await)
        }
    }
}

/// Navigate to a project page and load the project, as opening it in the UI would
async fn open_project(store: &ProjectsStore, project_id: Id) -> Result<kb_models::Project> {
    let path = format!("/projects/{}", project_id);
    store.navigator().navigate(NavigationTarget::path(path))?;
    require(store.load_project(project_id).await)
}

async fn open_board(
    store: &ProjectsStore,
    project_id: Id,
    board_id: Id,
) -> Result<kb_models::BoardFull> {
    open_project(store, project_id).await?;
    require(store.load_board(Some(board_id)).await)
}

fn require<T>(outcome: ActionOutcome<T>) -> Result<T> {
    match outcome {
        ActionOutcome::Done(value) => Ok(value),
        ActionOutcome::Skipped(precondition) => bail!("skipped: {}", precondition),
        ActionOutcome::Failed(error) => Err(anyhow!(error)),
        ActionOutcome::Superseded => bail!("request was superseded"),
    }
}

/// Print a completed action's value as JSON
fn finish<T: Serialize>(outcome: ActionOutcome<T>) -> Result<()> {
    let value = require(outcome)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn route(router: &Router, path: &str, from: Option<&str>) -> Result<()> {
    if let Some(from) = from {
        router.navigate(NavigationTarget::path(from))?;
    }
    let route = router.navigate(NavigationTarget::path(path))?;

    println!("location: {}", route.location);
    if let Some(name) = &route.name {
        println!("name:     {}", name);
    }
    if let Some(origin) = &route.redirected_from {
        println!("from:     {}", origin);
    }
    let views: Vec<_> = route.views.iter().map(|v| format!("{:?}", v)).collect();
    println!("views:    {}", views.join(" > "));
    Ok(())
}
