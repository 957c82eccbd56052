//! Router-driven workflow.
//!
//! Instead of the fixed planner -> writer order, a routing model is shown the
//! agents discovered on every server and decides, one step at a time, which
//! agent to call next and with what input. Each reply must be one JSON object:
//!
//! - `{"action": "call_agent", "agent": "...", "input": "..."}`
//! - `{"action": "final_answer", "answer": "..."}`
//!
//! A reply with no recognisable decision is taken as the final answer.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::orchestrator::require_text;
use super::OutputStore;
use crate::acp::{AcpClient, AgentManifest};
use crate::agent::{LlmBackend, LlmRequest};
use crate::error::{ChainError, Result};
use crate::marketing::{crew_prompt, CompanyContext};

/// Upper bound on router decisions for one run
const MAX_STEPS: usize = 8;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2048;

/// Agent found on one of the servers, with the client that reaches it
#[derive(Debug, Clone)]
pub struct RemoteAgent {
    pub manifest: AgentManifest,
    client: AcpClient,
}

/// One step the router asked for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Decision {
    CallAgent { agent: String, input: String },
    FinalAnswer { answer: String },
}

/// Agent call already made, replayed to the router on the next step
#[derive(Debug, Clone)]
struct Step {
    agent: String,
    input: String,
    output: String,
}

/// Result of a crew run
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutcome {
    pub post_path: PathBuf,
    pub answer: String,
    /// Agents actually run, in call order
    pub agents_called: Vec<String>,
}

pub struct Crew {
    router: Arc<dyn LlmBackend>,
    clients: Vec<AcpClient>,
    store: OutputStore,
}

impl Crew {
    pub fn new(router: Arc<dyn LlmBackend>, clients: Vec<AcpClient>, store: OutputStore) -> Self {
        Self {
            router,
            clients,
            store,
        }
    }

    /// Collect the agents of every server. The first server listing a name owns it.
    pub async fn discover(&self) -> Result<Vec<RemoteAgent>> {
        let mut agents: Vec<RemoteAgent> = Vec::new();
        for client in &self.clients {
            for manifest in client.agents().await? {
                if agents.iter().any(|a| a.manifest.name == manifest.name) {
                    warn!(
                        agent = %manifest.name,
                        service = client.service(),
                        "Agent already provided by another server, ignoring"
                    );
                    continue;
                }
                agents.push(RemoteAgent {
                    manifest,
                    client: client.clone(),
                });
            }
        }
        Ok(agents)
    }

    /// Let the router drive the agents until it produces a blog post
    pub async fn run(
        &self,
        context: &CompanyContext,
        specific_request: Option<&str>,
    ) -> Result<CrewOutcome> {
        let agents = self.discover().await?;
        if agents.is_empty() {
            return Err(ChainError::upstream("router", "no agents discovered"));
        }
        let names: Vec<&str> = agents.iter().map(|a| a.manifest.name.as_str()).collect();
        info!(agents = ?names, "Discovered agents");

        let system = router_instructions(&agents);
        let task = crew_prompt(context, specific_request);
        let mut steps: Vec<Step> = Vec::new();
        let mut agents_called = Vec::new();

        for iteration in 1..=MAX_STEPS {
            debug!(iteration, "Asking router for the next step");
            let request = LlmRequest::new(step_prompt(&task, &steps))
                .with_system(system.as_str())
                .with_sampling(TEMPERATURE, MAX_TOKENS);
            let reply = self
                .router
                .complete(&request)
                .await
                .map_err(|e| ChainError::upstream("router", e.to_string()))?;

            match Decision::parse(&reply) {
                Decision::CallAgent { agent, input } => {
                    let output = match agents.iter().find(|a| a.manifest.name == agent) {
                        Some(remote) => {
                            info!(agent = %agent, service = remote.client.service(), "Calling agent");
                            let output = remote.client.run_sync(&agent, &input).await?;
                            agents_called.push(agent.clone());
                            output
                        }
                        None => {
                            warn!(agent = %agent, "Router asked for an unknown agent");
                            format!(
                                "Error: there is no agent named '{agent}'. Available agents: {}",
                                names.join(", ")
                            )
                        }
                    };
                    steps.push(Step {
                        agent,
                        input,
                        output,
                    });
                }
                Decision::FinalAnswer { answer } => {
                    let answer = require_text("router", answer)?;
                    let post_path = self.store.save_post(context, &answer)?;
                    info!(path = %post_path.display(), steps = iteration, "Blog post saved");
                    return Ok(CrewOutcome {
                        post_path,
                        answer,
                        agents_called,
                    });
                }
            }
        }

        Err(ChainError::upstream(
            "router",
            format!("no final answer after {MAX_STEPS} steps"),
        ))
    }
}

impl Decision {
    /// Accepts raw JSON, a fenced block, or an object embedded in prose
    fn parse(reply: &str) -> Self {
        let trimmed = reply.trim();
        let candidates = [
            Some(trimmed),
            fenced_block(trimmed),
            trimmed.find('{').and_then(|start| balanced_object(&trimmed[start..])),
        ];

        candidates
            .into_iter()
            .flatten()
            .find_map(|candidate| serde_json::from_str(candidate.trim()).ok())
            .unwrap_or_else(|| Decision::FinalAnswer {
                answer: trimmed.to_string(),
            })
    }
}

/// Body of the first ``` fence, language tag skipped
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let body_start = start + text[start..].find('\n')? + 1;
    let body_end = body_start + text[body_start..].find("```")?;
    Some(&text[body_start..body_end])
}

/// Leading `{...}` of `text`, braces inside strings ignored
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn router_instructions(agents: &[RemoteAgent]) -> String {
    let list: String = agents
        .iter()
        .map(|a| format!("- {}: {}\n", a.manifest.name, a.manifest.description))
        .collect();

    format!(
        r#"You coordinate a team of remote agents to complete the user's task.

AVAILABLE AGENTS:
{list}
Reply with exactly one JSON object and nothing else.
To call an agent:
{{"action": "call_agent", "agent": "<agent name>", "input": "<full input for the agent>"}}
When the task is complete:
{{"action": "final_answer", "answer": "<the finished blog post in markdown>"}}

Agents do not see each other's output. Pass everything an agent needs in its input."#
    )
}

fn step_prompt(task: &str, steps: &[Step]) -> String {
    if steps.is_empty() {
        return task.to_string();
    }

    let mut prompt = format!("{task}\n\nPREVIOUS STEPS:");
    for (i, step) in steps.iter().enumerate() {
        prompt.push_str(&format!(
            "\n\nStep {}: called {}\nInput:\n{}\nOutput:\n{}",
            i + 1,
            step.agent,
            step.input,
            step.output
        ));
    }
    prompt.push_str("\n\nDecide the next step.");
    prompt
}
