use super::CompanyContext;

/// Used when the caller gives no specific request
pub const DEFAULT_REQUEST: &str = "Create a comprehensive marketing strategy to increase brand awareness and drive customer acquisition";

/// Build the input sent to the planner agent
pub fn planner_prompt(context: &CompanyContext, specific_request: Option<&str>) -> String {
    let request = specific_request
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REQUEST);

    format!(
        r#"Create a comprehensive marketing strategy for {company} in the {industry} industry.

COMPANY CONTEXT:
- Company Type: {company}
- Industry: {industry}
- Target Audience: {audience}
- Value Proposition: {value}
- Key Benefits: {benefits}

SPECIFIC REQUEST: {request}

REQUIREMENTS:
1. Research current marketing trends in the AI/tech industry
2. Identify target audience segments and their pain points
3. Develop a multi-channel marketing strategy
4. Include specific tactics for:
   - Content marketing
   - Social media
   - SEO optimization
   - Lead generation
   - Customer acquisition
5. Provide measurable KPIs and success metrics
6. Include budget allocation recommendations
7. Timeline for implementation

OUTPUT FORMAT:
- Executive Summary
- Market Analysis
- Target Audience Analysis
- Marketing Strategy Overview
- Channel-Specific Tactics
- Implementation Timeline
- Budget Allocation
- Success Metrics & KPIs
- Risk Assessment"#,
        company = context.company_type,
        industry = context.industry,
        audience = context.target_audience,
        value = context.value_proposition,
        benefits = context.benefits_line(),
        request = request,
    )
}

/// Build the input sent to the blog writer agent
pub fn writer_prompt(marketing_plan: &str, context: &CompanyContext) -> String {
    format!(
        r#"Write a compelling, SEO-optimized blog post based on the following marketing strategy.

MARKETING STRATEGY:
{plan}

COMPANY CONTEXT:
- Company: {company}
- Industry: {industry}
- Target Audience: {audience}

BLOG POST REQUIREMENTS:
1. Create an engaging headline that includes relevant keywords
2. Write a compelling introduction that hooks the reader
3. Structure the content with clear headings and subheadings
4. Include actionable insights and practical tips
5. Optimize for SEO with relevant keywords naturally integrated
6. Include a strong call-to-action
7. Target length: 1000-1500 words
8. Tone: Professional yet approachable
9. Include relevant statistics and examples where appropriate

IMPORTANT: Write the blog post in clean markdown format, ready-to-publish. Do NOT include labels like "SEO-Optimized Headline:" or "Meta Description:".
Just write the actual blog post content with proper markdown formatting (headings, paragraphs, lists, etc.).
Start directly with the main headline and content."#,
        plan = marketing_plan.trim(),
        company = context.company_type,
        industry = context.industry,
        audience = context.target_audience,
    )
}

/// Task handed to the routing agent of the `crew` workflow
pub fn crew_prompt(context: &CompanyContext, specific_request: Option<&str>) -> String {
    let request = specific_request
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REQUEST);

    format!(
        r#"Create a marketing blog post for {company} in the {industry} industry.

COMPANY CONTEXT:
- Company Type: {company}
- Industry: {industry}
- Target Audience: {audience}
- Value Proposition: {value}
- Key Benefits: {benefits}

SPECIFIC REQUEST: {request}

REQUIREMENTS:
- Research current marketing trends in the AI/tech industry.
- Identify target audience segments and their pain points.
- Develop a multi-channel marketing strategy.
- Include specific tactics for:
   - Content marketing
   - Social media
   - SEO optimization
   - Lead generation
   - Customer acquisition

OUTPUT FORMAT:
- Executive Summary
- Market Analysis
- Target Audience Analysis
- Marketing Strategy Overview
- Channel-Specific Tactics
- Implementation Timeline
- Budget Allocation
- Success Metrics & KPIs
- Risk Assessment"#,
        company = context.company_type,
        industry = context.industry,
        audience = context.target_audience,
        value = context.value_proposition,
        benefits = context.benefits_line(),
        request = request,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fintech() -> CompanyContext {
        CompanyContext::new(
            "SaaS Platform",
            "FinTech",
            "Financial professionals",
            "Automated financial reporting",
            vec!["Real-time analytics".into(), "Compliance automation".into()],
        )
    }

    #[test]
    fn test_planner_prompt_contains_context() {
        let prompt = planner_prompt(&fintech(), Some("Launch our reporting suite"));

        assert!(prompt.starts_with("Create a comprehensive marketing strategy for SaaS Platform"));
        assert!(prompt.contains("- Industry: FinTech"));
        assert!(prompt.contains("- Target Audience: Financial professionals"));
        assert!(prompt.contains("- Key Benefits: Real-time analytics, Compliance automation"));
        assert!(prompt.contains("SPECIFIC REQUEST: Launch our reporting suite"));
        assert!(prompt.contains("- Risk Assessment"));
    }

    #[test]
    fn test_planner_prompt_falls_back_to_default_request() {
        let prompt = planner_prompt(&fintech(), None);
        assert!(prompt.contains(&format!("SPECIFIC REQUEST: {DEFAULT_REQUEST}")));

        let prompt = planner_prompt(&fintech(), Some("   "));
        assert!(prompt.contains(&format!("SPECIFIC REQUEST: {DEFAULT_REQUEST}")));
    }

    #[test]
    fn test_writer_prompt_embeds_plan() {
        let plan = "\n## Executive Summary\nGrow pipeline by 40%.\n";
        let prompt = writer_prompt(plan, &fintech());

        assert!(prompt.contains("MARKETING STRATEGY:\n## Executive Summary\nGrow pipeline by 40%."));
        assert!(prompt.contains("- Company: SaaS Platform"));
        assert!(prompt.contains("Start directly with the main headline"));
        // Value proposition is only part of the planner input
        assert!(!prompt.contains("Automated financial reporting"));
    }

    #[test]
    fn test_crew_prompt_asks_for_blog_post() {
        let prompt = crew_prompt(&fintech(), None);

        assert!(prompt.starts_with("Create a marketing blog post for SaaS Platform in the FinTech industry."));
        assert!(prompt.contains("- Value Proposition: Automated financial reporting"));
        assert!(prompt.contains(&format!("SPECIFIC REQUEST: {DEFAULT_REQUEST}")));
        assert!(prompt.ends_with("- Risk Assessment"));
    }
}
