use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod detect;
mod document;
mod error;
mod extract;
mod fetch;
mod output;
mod platform;
mod server;
mod telemetry;

#[derive(Parser)]
#[command(name = "sleuth", about = "Storefront platform and store id detection")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a storefront URL and report its platform and store id
    Detect(detect::DetectCmd),
    /// Analyze a saved HTML page without fetching
    Inspect(detect::InspectCmd),
    /// List supported platforms and their extraction rules
    Platforms,
    /// Serve the detection API over HTTP
    Serve(server::ServeCmd),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // logs go to stderr; respects RUST_LOG and SLEUTH_LOG_FORMAT
    telemetry::config::init_tracing();

    let ok = match cli.command {
        Commands::Detect(args) => detect::run(args).await?,
        Commands::Inspect(args) => { detect::inspect(args)?; true }
        Commands::Platforms => { platform::list()?; true }
        Commands::Serve(args) => { server::run(args).await?; true }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["sleuth", "detect", "shop.example", "--json", "--timeout-secs", "5"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Detect(_)));
    }
}
