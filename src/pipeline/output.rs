use std::path::{Path, PathBuf};

use crate::error::{ChainError, Result};
use crate::marketing::CompanyContext;

pub const PLAN_FILE: &str = "marketing_plan.md";
pub const POST_FILE: &str = "blog_post.md";

/// Output file manager
pub struct OutputStore {
    output_dir: PathBuf,
}

impl OutputStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Get plan file path
    pub fn plan_path(&self) -> PathBuf {
        self.output_dir.join(PLAN_FILE)
    }

    /// Get blog post file path
    pub fn post_path(&self) -> PathBuf {
        self.output_dir.join(POST_FILE)
    }

    /// Save the marketing plan, replacing any previous one
    pub fn save_plan(&self, context: &CompanyContext, plan: &str) -> Result<PathBuf> {
        let path = self.plan_path();
        self.write(&path, "Marketing Plan", context, plan)?;
        Ok(path)
    }

    /// Save the polished blog post, replacing any previous one
    pub fn save_post(&self, context: &CompanyContext, post: &str) -> Result<PathBuf> {
        let path = self.post_path();
        self.write(&path, "Blog Post", context, post)?;
        Ok(path)
    }

    fn write(&self, path: &Path, title: &str, context: &CompanyContext, body: &str) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ChainError::io(&self.output_dir, e))?;
        std::fs::write(path, render(title, context, body)).map_err(|e| ChainError::io(path, e))
    }
}

fn render(title: &str, context: &CompanyContext, body: &str) -> String {
    format!(
        "# {}\n\n**Company:** {}\n**Industry:** {}\n\n{}",
        title, context.company_type, context.industry, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_use_fixed_names() {
        let store = OutputStore::new("marketing_outputs");
        assert_eq!(store.plan_path(), PathBuf::from("marketing_outputs/marketing_plan.md"));
        assert_eq!(store.post_path(), PathBuf::from("marketing_outputs/blog_post.md"));
    }

    #[test]
    fn test_save_plan_creates_dir_and_header() {
        let temp_dir = TempDir::new().unwrap();
        let store = OutputStore::new(temp_dir.path().join("nested/out"));
        let context = CompanyContext::default();

        let path = store.save_plan(&context, "## Executive Summary").unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "# Marketing Plan\n\n**Company:** AI startup\n**Industry:** Marketing Technology\n\n## Executive Summary"
        );
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = OutputStore::new(temp_dir.path());
        let context = CompanyContext::default();

        store.save_post(&context, "first version").unwrap();
        store.save_post(&context, "second").unwrap();

        let content = std::fs::read_to_string(store.post_path()).unwrap();
        assert!(content.starts_with("# Blog Post\n"));
        assert!(content.ends_with("second"));
        assert!(!content.contains("first version"));
    }

    #[test]
    fn test_unwritable_dir_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the directory should be
        let blocker = temp_dir.path().join("out");
        std::fs::write(&blocker, "").unwrap();

        let store = OutputStore::new(&blocker);
        let err = store.save_plan(&CompanyContext::default(), "plan").unwrap_err();
        assert!(matches!(err, ChainError::Io { .. }));
    }
}
