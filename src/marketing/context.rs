use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Business the marketing content is generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyContext {
    pub company_type: String,
    pub industry: String,
    pub target_audience: String,
    pub value_proposition: String,
    /// Order is kept in the prompts
    pub key_benefits: Vec<String>,
}

impl Default for CompanyContext {
    fn default() -> Self {
        Self {
            company_type: "AI startup".into(),
            industry: "Marketing Technology".into(),
            target_audience: "Marketing professionals, business owners, and growth teams".into(),
            value_proposition: "AI-powered marketing optimization and content creation".into(),
            key_benefits: vec![
                "Automated content generation".into(),
                "SEO optimization".into(),
                "Audience targeting".into(),
                "Performance analytics".into(),
            ],
        }
    }
}

/// Partial context; every field present replaces the default one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextOverrides {
    pub company_type: Option<String>,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub value_proposition: Option<String>,
    pub key_benefits: Option<Vec<String>>,
}

impl CompanyContext {
    #[cfg(test)]
    pub fn new(
        company_type: impl Into<String>,
        industry: impl Into<String>,
        target_audience: impl Into<String>,
        value_proposition: impl Into<String>,
        key_benefits: Vec<String>,
    ) -> Self {
        Self {
            company_type: company_type.into(),
            industry: industry.into(),
            target_audience: target_audience.into(),
            value_proposition: value_proposition.into(),
            key_benefits,
        }
    }

    /// Load overrides from a JSON file and merge them over the default context
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context: {}", path.display()))?;
        let overrides: ContextOverrides = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse context: {}", path.display()))?;
        Ok(Self::default().with_overrides(overrides))
    }

    pub fn with_overrides(self, overrides: ContextOverrides) -> Self {
        Self {
            company_type: overrides.company_type.unwrap_or(self.company_type),
            industry: overrides.industry.unwrap_or(self.industry),
            target_audience: overrides.target_audience.unwrap_or(self.target_audience),
            value_proposition: overrides.value_proposition.unwrap_or(self.value_proposition),
            key_benefits: overrides.key_benefits.unwrap_or(self.key_benefits),
        }
    }

    /// Benefits as a single comma separated line
    pub fn benefits_line(&self) -> String {
        self.key_benefits.join(", ")
    }
}
