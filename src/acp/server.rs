use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::models::{AgentList, AgentManifest, Message, Run, RunCreateRequest, RunError, RunStatus};
use crate::agent::Agent;

/// Shared, read-only agent registry
#[derive(Clone)]
struct ServerState {
    agents: Arc<Vec<Arc<dyn Agent>>>,
}

impl ServerState {
    fn find(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.iter().find(|a| a.name() == name).cloned()
    }
}

/// HTTP server hosting a set of agents
#[derive(Default)]
pub struct AgentServer {
    agents: Vec<Arc<dyn Agent>>,
}

impl AgentServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. A later agent with the same name is never reached.
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        if self.agents.iter().any(|a| a.name() == agent.name()) {
            warn!(agent = agent.name(), "Duplicate agent name, ignoring");
            return self;
        }
        self.agents.push(agent);
        self
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn router(self) -> Router {
        let state = ServerState {
            agents: Arc::new(self.agents),
        };

        Router::new()
            .route("/agents", get(list_agents))
            .route("/runs", post(create_run))
            .with_state(state)
    }

    /// Serve until Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        info!(%addr, agents = ?self.agent_names(), "Agent server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
                info!("Agent server shutting down");
            })
            .await
    }
}

async fn list_agents(State(state): State<ServerState>) -> Json<AgentList> {
    let agents = state
        .agents
        .iter()
        .map(|a| AgentManifest {
            name: a.name().to_string(),
            description: a.description().to_string(),
        })
        .collect();
    Json(AgentList { agents })
}

async fn create_run(
    State(state): State<ServerState>,
    Json(request): Json<RunCreateRequest>,
) -> Response {
    let Some(agent) = state.find(&request.agent_name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Agent {} not found", request.agent_name) })),
        )
            .into_response();
    };

    let input = request
        .input
        .iter()
        .find_map(Message::first_text)
        .filter(|text| !text.trim().is_empty());
    let Some(input) = input else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Run input must contain a non-empty text part" })),
        )
            .into_response();
    };

    let run_id = Uuid::new_v4().to_string();
    info!(agent = agent.name(), %run_id, "Run started");

    let run = match agent.run(input).await {
        Ok(output) => {
            info!(agent = agent.name(), %run_id, chars = output.len(), "Run completed");
            Run {
                run_id,
                agent_name: request.agent_name,
                status: RunStatus::Completed,
                output: vec![Message::text(output)],
                error: None,
            }
        }
        Err(e) => {
            error!(agent = agent.name(), %run_id, "Run failed: {}", e);
            Run {
                run_id,
                agent_name: request.agent_name,
                status: RunStatus::Failed,
                output: Vec::new(),
                error: Some(RunError {
                    code: "agent_error".into(),
                    message: e.to_string(),
                }),
            }
        }
    };

    Json(run).into_response()
}
