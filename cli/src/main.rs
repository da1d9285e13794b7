use clap::{Parser, Subcommand};

mod commands;
mod util;

use commands::operations::OperationCommands;

#[derive(Parser)]
#[command(
    name = "tutordesk",
    version,
    about = "TutorDesk CLI: ask the tutor, build timetables and study plans, generate reports"
)]
struct Cli {
    /// API base URL
    #[arg(long, env = "TUTORDESK_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Print compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health and fallback counters
    Health,
    #[command(flatten)]
    Operation(OperationCommands),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let api_url = cli.api_url.trim_end_matches('/');

    let code = match cli.command {
        Commands::Health => commands::health::run(api_url, cli.raw).await,
        Commands::Operation(command) => commands::operations::run(api_url, cli.raw, command).await,
    };

    std::process::exit(code);
}
