mod acp;
mod agent;
mod config;
mod error;
mod marketing;
mod pipeline;
mod telemetry;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use acp::{AcpClient, AgentServer};
use agent::{BlogWriter, GeminiBackend, LlmBackend, MarketingPlanner, SupervisorAgent};
use config::AppConfig;
use marketing::CompanyContext;
use pipeline::{AcpPlanner, AcpWriter, Crew, Orchestrator, OutputStore};

/// Planner/writer agent chain for marketing content
#[derive(Debug, Parser)]
#[command(name = "marketing-chain", version, about)]
struct Cli {
    /// Config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a marketing plan and a blog post (default)
    Run(RunArgs),
    /// Let a routing model pick which agents to call to produce a blog post
    Crew(RunArgs),
    /// Serve the marketing planner agent
    Planner(ServeArgs),
    /// Serve the blog writer and supervisor agents
    Writer(ServeArgs),
    /// List agents available on the planner and writer servers
    Agents,
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    /// JSON file with company context fields overriding the defaults
    #[arg(long)]
    context: Option<PathBuf>,
    /// Specific marketing request passed to the planner
    #[arg(long)]
    request: Option<String>,
    /// Directory for marketing_plan.md and blog_post.md
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print the run outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Defaults to 8000 for the planner, 8001 for the writer
    #[arg(long)]
    port: Option<u16>,
}

impl ServeArgs {
    fn addr(&self, default_port: u16) -> Result<SocketAddr> {
        let port = self.port.unwrap_or(default_port);
        format!("{}:{}", self.host, port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, port))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.with_env();
    telemetry::init(&config.log_level);

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run_chain(config, args).await,
        Command::Crew(args) => run_crew(config, args).await,
        Command::Planner(args) => serve_planner(config, args).await,
        Command::Writer(args) => serve_writer(config, args).await,
        Command::Agents => list_agents(config).await,
    }
}

impl RunArgs {
    fn apply(&self, config: AppConfig) -> AppConfig {
        match &self.output_dir {
            Some(dir) => config.with_output_dir(dir),
            None => config,
        }
    }

    fn company_context(&self) -> Result<CompanyContext> {
        match &self.context {
            Some(path) => CompanyContext::load(path),
            None => Ok(CompanyContext::default()),
        }
    }
}

async fn run_chain(config: AppConfig, args: RunArgs) -> Result<()> {
    let config = args.apply(config);
    config.validate()?;
    let context = args.company_context()?;

    let planner = AcpClient::new("planner", &config.planner_url, config.request_timeout())?;
    let writer = AcpClient::new("writer", &config.writer_url, config.request_timeout())?;
    let orchestrator = Orchestrator::new(
        AcpPlanner::new(planner),
        AcpWriter::new(writer),
        OutputStore::new(&config.output_dir),
    );

    info!(company = %context.company_type, industry = %context.industry, "Starting marketing workflow");
    let outcome = orchestrator
        .run(&context, args.request.as_deref())
        .await
        .context("Marketing workflow failed")?;

    let elapsed = outcome.finished_at - outcome.started_at;
    info!(seconds = elapsed.num_seconds(), "Marketing workflow finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Marketing plan: {}", outcome.plan_path.display());
        println!("Blog post:      {}", outcome.post_path.display());
    }
    Ok(())
}

async fn run_crew(config: AppConfig, args: RunArgs) -> Result<()> {
    let config = args.apply(config);
    let router = llm_backend(&config)?;
    let context = args.company_context()?;

    let crew = Crew::new(router, agent_clients(&config)?, OutputStore::new(&config.output_dir));

    info!(company = %context.company_type, industry = %context.industry, "Starting crew workflow");
    let outcome = crew
        .run(&context, args.request.as_deref())
        .await
        .context("Crew workflow failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Agents called: {}", outcome.agents_called.join(" -> "));
        println!("Blog post:     {}", outcome.post_path.display());
    }
    Ok(())
}

/// Clients for the planner and writer servers, in that order
fn agent_clients(config: &AppConfig) -> Result<Vec<AcpClient>> {
    let timeout = config.request_timeout();
    Ok(vec![
        AcpClient::new("planner", &config.planner_url, timeout)?,
        AcpClient::new("writer", &config.writer_url, timeout)?,
    ])
}

fn llm_backend(config: &AppConfig) -> Result<Arc<dyn LlmBackend>> {
    config.validate()?;
    let backend = GeminiBackend::from_config(config)?;
    info!(backend = backend.name(), model = %config.model, "LLM backend ready");
    Ok(Arc::new(backend))
}

async fn serve_planner(config: AppConfig, args: ServeArgs) -> Result<()> {
    let backend = llm_backend(&config)?;
    let server = AgentServer::new().agent(Arc::new(MarketingPlanner::new(backend)));
    serve(server, args.addr(8000)?).await
}

async fn serve_writer(config: AppConfig, args: ServeArgs) -> Result<()> {
    let backend = llm_backend(&config)?;
    let server = AgentServer::new()
        .agent(Arc::new(BlogWriter::new(backend.clone())))
        .agent(Arc::new(SupervisorAgent::new(backend)));
    serve(server, args.addr(8001)?).await
}

async fn serve(server: AgentServer, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    server.serve(listener).await.context("Agent server failed")
}

async fn list_agents(config: AppConfig) -> Result<()> {
    config.validate()?;

    for client in &agent_clients(&config)? {
        match client.agents().await {
            Ok(agents) => {
                for agent in agents {
                    println!("{:<18} {:<8} {}", agent.name, client.service(), agent.description);
                }
            }
            Err(e) => warn!("{} ({}) unavailable: {}", client.service(), client.base_url(), e),
        }
    }
    Ok(())
}
