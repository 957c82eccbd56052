use async_trait::async_trait;

use super::{PlannerService, WriterService};
use crate::acp::AcpClient;
use crate::agent::{BLOG_WRITER_AGENT, PLANNER_AGENT, SUPERVISOR_AGENT};
use crate::error::Result;
use crate::marketing::{planner_prompt, writer_prompt, CompanyContext};

/// Planner service reached over ACP
pub struct AcpPlanner {
    client: AcpClient,
}

impl AcpPlanner {
    pub fn new(client: AcpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlannerService for AcpPlanner {
    async fn generate_plan(
        &self,
        context: &CompanyContext,
        specific_request: Option<&str>,
    ) -> Result<String> {
        let input = planner_prompt(context, specific_request);
        self.client.run_sync(PLANNER_AGENT, &input).await
    }
}

/// Writer service reached over ACP
pub struct AcpWriter {
    client: AcpClient,
}

impl AcpWriter {
    pub fn new(client: AcpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WriterService for AcpWriter {
    async fn write_post(&self, plan: &str, context: &CompanyContext) -> Result<String> {
        let input = writer_prompt(plan, context);
        self.client.run_sync(BLOG_WRITER_AGENT, &input).await
    }

    async fn polish(&self, draft: &str) -> Result<String> {
        self.client.run_sync(SUPERVISOR_AGENT, draft).await
    }
}
