mod backend;
mod planner;
mod writer;

use async_trait::async_trait;

pub use backend::{BackendError, GeminiBackend, LlmBackend, LlmRequest};
pub use planner::{MarketingPlanner, PLANNER_AGENT};
pub use writer::{BlogWriter, SupervisorAgent, BLOG_WRITER_AGENT, SUPERVISOR_AGENT};

/// Agent hosted on an ACP server
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name used in `POST /runs`
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn run(&self, input: &str) -> Result<String, BackendError>;
}
