use crate::commands::{run_parse, run_scan, ParseArgs, ScanArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use workforce_analytics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Workforce Analytics",
    about = "Collect job listings from public careers pages",
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
    /// Fetch a careers page and extract its job listings
    Scan(ScanArgs),
    /// Extract job listings from a saved HTML page
    Parse(ParseArgs),
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
        // The page fetcher blocks; keep it off the async workers.
        Command::Scan(args) => tokio::task::spawn_blocking(move || run_scan(args))
            .await
            .map_err(|err| AppError::Server(axum::Error::new(err)))?,
        Command::Parse(args) => run_parse(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::OutputFormat;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["workforce-analytics-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn scan_accepts_format_and_static_flag() {
        let cli = Cli::try_parse_from([
            "workforce-analytics-api",
            "scan",
            "--url",
            "https://careers.example.com",
            "--static",
            "--format",
            "csv",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Scan(args)) => {
                assert_eq!(args.url, "https://careers.example.com");
                assert!(args.static_only);
                assert_eq!(args.output.format, OutputFormat::Csv);
            }
            other => panic!("expected scan command, got {other:?}"),
        }
    }

    #[test]
    fn parse_requires_file_and_base_url() {
        assert!(Cli::try_parse_from(["workforce-analytics-api", "parse", "--file", "x.html"]).is_err());
    }
}
