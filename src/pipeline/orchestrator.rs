use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::OutputStore;
use crate::error::{ChainError, Result};
use crate::marketing::CompanyContext;

/// Produces a marketing plan for a company
#[async_trait]
pub trait PlannerService: Send + Sync {
    async fn generate_plan(
        &self,
        context: &CompanyContext,
        specific_request: Option<&str>,
    ) -> Result<String>;
}

/// Turns a plan into a blog post, in two stages
#[async_trait]
pub trait WriterService: Send + Sync {
    async fn write_post(&self, plan: &str, context: &CompanyContext) -> Result<String>;

    async fn polish(&self, draft: &str) -> Result<String>;
}

/// Result of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub plan_path: PathBuf,
    pub post_path: PathBuf,
    pub marketing_plan: String,
    pub blog_content: String,
    pub context: CompanyContext,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Planner -> writer -> files, strictly in order
pub struct Orchestrator<P, W> {
    planner: P,
    writer: W,
    store: OutputStore,
}

impl<P: PlannerService, W: WriterService> Orchestrator<P, W> {
    pub fn new(planner: P, writer: W, store: OutputStore) -> Self {
        Self {
            planner,
            writer,
            store,
        }
    }

    /// Run the whole chain. The first failure aborts the run.
    pub async fn run(
        &self,
        context: &CompanyContext,
        specific_request: Option<&str>,
    ) -> Result<RunOutcome> {
        let started_at = Utc::now();

        info!("===== Starting marketing planning phase =====");
        let plan = self.planner.generate_plan(context, specific_request).await?;
        let plan = require_text("planner", plan)?;
        let plan_path = self.store.save_plan(context, &plan)?;
        info!(path = %plan_path.display(), "Marketing plan saved");

        info!("===== Starting content creation phase =====");
        let draft = self.writer.write_post(&plan, context).await?;
        let draft = require_text("writer", draft)?;
        debug!(chars = draft.len(), "Draft received, polishing");

        let post = self.writer.polish(&draft).await?;
        let post = require_text("writer", post)?;
        let post_path = self.store.save_post(context, &post)?;
        info!(path = %post_path.display(), "Blog post saved");

        Ok(RunOutcome {
            plan_path,
            post_path,
            marketing_plan: plan,
            blog_content: post,
            context: context.clone(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Blank output is a broken response, never an empty file
pub(super) fn require_text(service: &str, text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(ChainError::upstream(service, "empty response"));
    }
    Ok(text)
}
