use crate::demo::{run_assess, run_demo, AssessArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_assess::config::AppConfig;
use credit_assess::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Retailer Credit Assessment",
    about = "Assess retailer credit worthiness from balance sheet and P&L figures",
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
    /// Assess one retailer from a JSON input file
    Assess(AssessArgs),
    /// Walk the sample retailer through every stage
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args, AppConfig::load()?.storage),
        Command::Demo(args) => run_demo(args, AppConfig::load()?.storage),
    }
}
