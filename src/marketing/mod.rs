mod context;
mod prompt;

pub use context::CompanyContext;
pub use prompt::{crew_prompt, planner_prompt, writer_prompt};
