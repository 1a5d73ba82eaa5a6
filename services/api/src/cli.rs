use crate::demo::{run_demo, run_funnel_report, DemoArgs, FunnelReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use partner_ops::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Partner Ops Portal",
    about = "Run and demonstrate the partner pipeline service from the command line",
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
    /// Pipeline analytics for partner-manager reviews
    Funnel {
        #[command(subcommand)]
        command: FunnelCommand,
    },
    /// Run an end-to-end CLI demo covering intake, stages, and commissions
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum FunnelCommand {
    /// Render the pipeline funnel report and optional deal listing
    Report(FunnelReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Funnel {
            command: FunnelCommand::Report(args),
        } => run_funnel_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
