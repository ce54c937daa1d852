use crate::demo::{run_batch, run_demo, BatchArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lendscore::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Scoring Service",
    about = "Run and exercise the loan risk scoring service from the command line",
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
    /// Score a canned application and print the full assessment
    Demo(DemoArgs),
    /// Score every application in a CSV export and print a summary
    Batch(BatchArgs),
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

pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Batch(args) => run_batch(args),
    }
}
