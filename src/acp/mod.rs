//! Agent Communication Protocol over HTTP
//!
//! - `GET /agents` lists the hosted agents
//! - `POST /runs` runs one agent synchronously and returns its output

mod client;
mod models;
mod server;

pub use client::AcpClient;
pub use models::AgentManifest;
pub use server::AgentServer;
