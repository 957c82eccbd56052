use std::time::Duration;

use tracing::debug;

use super::models::{AgentList, AgentManifest, Message, Run, RunCreateRequest, RunMode, RunStatus};
use crate::error::{ChainError, Result};

/// Client for one agent server
#[derive(Debug, Clone)]
pub struct AcpClient {
    /// Label used in errors and logs ("planner", "writer")
    service: String,
    base_url: String,
    http: reqwest::Client,
}

impl AcpClient {
    pub fn new(
        service: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            service: service.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Agents hosted by the server
    pub async fn agents(&self) -> Result<Vec<AgentManifest>> {
        let response = self
            .http
            .get(format!("{}/agents", self.base_url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = self.check_status(response).await?;
        let list: AgentList = response
            .json()
            .await
            .map_err(|e| self.body_error("agent list", e))?;
        Ok(list.agents)
    }

    /// Run an agent synchronously and return its text output
    pub async fn run_sync(&self, agent: &str, input: &str) -> Result<String> {
        let request = RunCreateRequest {
            agent_name: agent.to_string(),
            input: vec![Message::text(input)],
            mode: RunMode::Sync,
        };

        debug!(service = %self.service, agent, "Sending run request");
        let response = self
            .http
            .post(format!("{}/runs", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = self.check_status(response).await?;
        let run: Run = response
            .json()
            .await
            .map_err(|e| self.body_error("run", e))?;

        if run.status == RunStatus::Failed {
            let message = run
                .error
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_else(|| "run failed without error details".into());
            return Err(ChainError::upstream(
                &self.service,
                format!("agent {agent} failed: {message}"),
            ));
        }

        debug!(service = %self.service, agent, run_id = %run.run_id, "Run completed");
        run.first_text().map(str::to_string).ok_or_else(|| {
            ChainError::upstream(&self.service, format!("no output received from {agent}"))
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ChainError {
        if err.is_timeout() {
            ChainError::connection(&self.service, format!("request timed out: {err}"))
        } else {
            ChainError::connection(&self.service, err.to_string())
        }
    }

    /// A stalled body is a transport failure, anything else is a bad payload
    fn body_error(&self, what: &str, err: reqwest::Error) -> ChainError {
        if err.is_timeout() {
            self.transport_error(err)
        } else {
            ChainError::upstream(&self.service, format!("malformed {what}: {err}"))
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ChainError::upstream(
            &self.service,
            format!("HTTP {status}: {body}"),
        ))
    }
}
