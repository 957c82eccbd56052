use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{Agent, BackendError, LlmBackend, LlmRequest};

pub const PLANNER_AGENT: &str = "marketing_planner";

const RESEARCHER_ROLE: &str = "You are a senior Market Research Analyst with 8+ years of experience in digital marketing research. \
You specialize in competitive analysis, trend identification, and market opportunity assessment. \
You gather and analyze data from multiple sources to provide actionable insights.";

const STRATEGIST_ROLE: &str = "You are a Senior Marketing Strategy Consultant with 12+ years of experience in digital marketing. \
You specialize in multi-channel marketing, customer journey optimization, and ROI-driven campaigns, \
and you translate market insights into actionable marketing plans.";

// Planning favors balance over creativity; plans are long
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4096;

/// Researches the market, then turns the research into a marketing plan
pub struct MarketingPlanner {
    backend: Arc<dyn LlmBackend>,
}

impl MarketingPlanner {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    fn research_request(input: &str) -> LlmRequest {
        LlmRequest::new(format!(
            r#"Conduct comprehensive market research for: {input}

Research Requirements:
1. Market size and growth trends
2. Competitive landscape analysis
3. Target audience demographics and behavior
4. Industry best practices and emerging trends
5. Potential challenges and opportunities
6. Relevant case studies and success stories

Provide detailed findings with data sources and actionable insights."#
        ))
        .with_system(RESEARCHER_ROLE)
        .with_sampling(TEMPERATURE, MAX_TOKENS)
    }

    fn strategy_request(input: &str, research: &str) -> LlmRequest {
        LlmRequest::new(format!(
            r#"Based on the market research findings below, develop a comprehensive marketing plan.

BRIEF:
{input}

RESEARCH FINDINGS:
{research}

Strategy Requirements:
1. Executive Summary
2. Market Analysis Summary
3. Target Audience Analysis
4. Marketing Strategy Overview
5. Channel-Specific Tactics:
   - Content Marketing
   - Social Media Marketing
   - SEO Strategy
   - Paid Advertising
   - Email Marketing
   - Influencer Marketing
6. Implementation Timeline (3-6 months)
7. Budget Allocation Recommendations
8. Success Metrics & KPIs
9. Risk Assessment & Mitigation
10. ROI Projections

Format as a professional marketing plan document."#
        ))
        .with_system(STRATEGIST_ROLE)
        .with_sampling(TEMPERATURE, MAX_TOKENS)
    }
}

#[async_trait]
impl Agent for MarketingPlanner {
    fn name(&self) -> &str {
        PLANNER_AGENT
    }

    fn description(&self) -> &str {
        "Performs market research and turns it into a comprehensive marketing plan"
    }

    async fn run(&self, input: &str) -> Result<String, BackendError> {
        info!("Starting marketing planning process");

        let research = self.backend.complete(&Self::research_request(input)).await?;
        info!(chars = research.len(), "Market research finished");

        self.backend
            .complete(&Self::strategy_request(input, &research))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedBackend;

    #[tokio::test]
    async fn test_strategy_builds_on_research() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            "Market grows 12% yearly",
            "# Marketing Plan\n## Executive Summary",
        ]));
        let planner = MarketingPlanner::new(backend.clone());

        let plan = planner.run("FinTech SaaS platform").await.unwrap();
        assert_eq!(plan, "# Marketing Plan\n## Executive Summary");

        let requests = backend.recorded();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt.contains("market research for: FinTech SaaS platform"));
        assert_eq!(requests[0].system.as_deref(), Some(RESEARCHER_ROLE));
        assert!(requests[1].prompt.contains("RESEARCH FINDINGS:\nMarket grows 12% yearly"));
        assert_eq!(requests[1].system.as_deref(), Some(STRATEGIST_ROLE));
        assert_eq!(requests[1].max_tokens, MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_research_failure_stops_planning() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::RateLimitExceeded));
        let planner = MarketingPlanner::new(backend.clone());

        let err = planner.run("anything").await.unwrap_err();
        assert!(matches!(err, BackendError::RateLimitExceeded));
        assert_eq!(backend.recorded().len(), 1);
    }

    #[test]
    fn test_planner_identity() {
        let planner = MarketingPlanner::new(Arc::new(ScriptedBackend::default()));
        assert_eq!(planner.name(), "marketing_planner");
        assert!(!planner.description().is_empty());
    }
}
