mod crew;
mod orchestrator;
mod output;
mod remote;

pub use crew::Crew;
pub use orchestrator::{Orchestrator, PlannerService, WriterService};
pub use output::OutputStore;
pub use remote::{AcpPlanner, AcpWriter};
