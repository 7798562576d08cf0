use crate::demo::{
    run_demo, run_health_report, run_workflow_report, DemoArgs, HealthArgs, WorkflowArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use handwerk_os::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "HandwerkOS Project Cockpit",
    about = "Project health signals and billing workflow decisions for trade businesses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate the health of one project snapshot read from a JSON file
    Health(HealthArgs),
    /// Decide the billing workflow for one project read from a JSON file
    Workflow(WorkflowArgs),
    /// Walk through health and billing decisions for a sample workshop
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON seed file with projects and companies (defaults to demo data)
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Health(args) => run_health_report(args),
        Command::Workflow(args) => run_workflow_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
