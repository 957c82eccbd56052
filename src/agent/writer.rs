use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{Agent, BackendError, LlmBackend, LlmRequest};

pub const BLOG_WRITER_AGENT: &str = "blog_writer";
pub const SUPERVISOR_AGENT: &str = "supervisor_agent";

// Slightly higher temperature for creative copy, room for long posts
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 8192;

const SPECIALIST_ROLE: &str = "You are a Senior Content Marketing Specialist with 10+ years of experience in digital marketing \
and content creation. You write tech and marketing content with deep expertise in SEO, conversion \
optimization, and audience engagement.";

const EDITOR_ROLE: &str = "You are an experienced Content Editor and Publisher. You remove meta-information, \
formatting guidelines, and technical instructions while preserving the core message of the content, \
so it can be used directly in a content management system.";

/// Writes an SEO blog post from a brief
pub struct BlogWriter {
    backend: Arc<dyn LlmBackend>,
}

impl BlogWriter {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    fn request(input: &str) -> LlmRequest {
        LlmRequest::new(format!(
            r#"{input}

Expected output: a complete, SEO-optimized blog post (1000-1500 words) with:
- Engaging headline and meta description
- Compelling introduction
- Well-structured content with clear headings
- Actionable insights and examples
- Strong conclusion with call-to-action
- Natural keyword integration
- SEO considerations and internal linking suggestions
- Meta tags and schema markup recommendations

Include all the technical SEO elements and meta-information that would be useful for publishing."#
        ))
        .with_system(SPECIALIST_ROLE)
        .with_sampling(TEMPERATURE, MAX_TOKENS)
    }
}

#[async_trait]
impl Agent for BlogWriter {
    fn name(&self) -> &str {
        BLOG_WRITER_AGENT
    }

    fn description(&self) -> &str {
        "Creates SEO-optimized, engaging blog posts from a marketing brief"
    }

    async fn run(&self, input: &str) -> Result<String, BackendError> {
        info!("Starting blog content creation process");
        self.backend.complete(&Self::request(input)).await
    }
}

/// Turns a raw draft into ready-to-publish markdown
pub struct SupervisorAgent {
    backend: Arc<dyn LlmBackend>,
}

impl SupervisorAgent {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    fn request(draft: &str) -> LlmRequest {
        LlmRequest::new(format!(
            r#"Take the following blog content and convert it to a clean, ready-to-publish format:

{draft}

Your task is to:
1. Remove all meta-instructions and formatting guidelines
2. Remove 'SEO Considerations' sections
3. Remove 'Internal Linking Suggestions' sections
4. Remove 'Meta Tags and Schema Markup Suggestions' sections
5. Remove keyword lists and technical SEO instructions
6. Keep only the actual blog post content
7. Ensure proper markdown formatting
8. Start with the main headline
9. End with a strong conclusion and call-to-action
10. Make sure the content flows naturally without any meta-information

Output ONLY the clean, ready-to-publish blog post content."#
        ))
        .with_system(EDITOR_ROLE)
        .with_sampling(TEMPERATURE, MAX_TOKENS)
    }
}

#[async_trait]
impl Agent for SupervisorAgent {
    fn name(&self) -> &str {
        SUPERVISOR_AGENT
    }

    fn description(&self) -> &str {
        "Removes meta-instructions and SEO notes, leaving ready-to-publish content"
    }

    async fn run(&self, input: &str) -> Result<String, BackendError> {
        info!("Starting content supervision and cleanup process");
        self.backend.complete(&Self::request(input)).await
    }
}
