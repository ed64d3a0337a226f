use crate::infra::load_selectors;
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use workforce_analytics::config::AppConfig;
use workforce_analytics::error::AppError;
use workforce_analytics::scrapers::{
    parse_listings, write_csv, FetchMode, HttpPageFetcher, JobBoardScraper, JobListingScraper,
    PageFetcher, ScanReport,
};
use workforce_analytics::telemetry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScanArgs {
    /// Careers page to scan
    #[arg(long)]
    pub(crate) url: String,
    /// Fetch the raw server response instead of the rendered page
    #[arg(long = "static")]
    pub(crate) static_only: bool,
    /// JSON file overriding the listing CSS selectors
    #[arg(long)]
    pub(crate) selectors: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ParseArgs {
    /// Saved HTML page
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// URL the page was saved from; relative links resolve against it
    #[arg(long)]
    pub(crate) base_url: String,
    /// JSON file overriding the listing CSS selectors
    #[arg(long)]
    pub(crate) selectors: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

pub(crate) fn run_scan(args: ScanArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let fetcher = Arc::new(HttpPageFetcher::new(&config.scraper)?);
    execute_scan(args, fetcher)
}

pub(crate) fn run_parse(args: ParseArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    execute_parse(args)
}

fn execute_scan(args: ScanArgs, fetcher: Arc<dyn PageFetcher>) -> Result<(), AppError> {
    let ScanArgs {
        url,
        static_only,
        selectors,
        output,
    } = args;

    let selectors = load_selectors(selectors.as_deref())?;
    let mode = if static_only {
        FetchMode::Static
    } else {
        FetchMode::Rendered
    };

    let scraper = JobListingScraper::with_selectors(url, fetcher, &selectors)?.with_fetch_mode(mode);
    let report = scraper.scan()?;

    emit(&report, scraper.positions_analyzed(), &output)
}

fn execute_parse(args: ParseArgs) -> Result<(), AppError> {
    let ParseArgs {
        file,
        base_url,
        selectors,
        output,
    } = args;

    let selectors = load_selectors(selectors.as_deref())?;
    let html = std::fs::read_to_string(&file)?;
    let listings = parse_listings(&html, &base_url, &selectors)?;
    info!(file = %file.display(), found = listings.len(), "parsed saved careers page");

    let positions = listings.len();
    let report = ScanReport::new(base_url, listings);
    emit(&report, positions, &output)
}

fn emit(report: &ScanReport, positions_analyzed: usize, output: &OutputArgs) -> Result<(), AppError> {
    match &output.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_report(report, positions_analyzed, output.format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(report, positions_analyzed, output.format, &mut writer)?;
        }
    }
    Ok(())
}

pub(crate) fn write_report<W: Write>(
    report: &ScanReport,
    positions_analyzed: usize,
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => render_text(report, positions_analyzed, writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report).map_err(io::Error::from)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_csv(&report.listings, writer)?,
    }
    Ok(())
}

fn render_text<W: Write>(
    report: &ScanReport,
    positions_analyzed: usize,
    out: &mut W,
) -> io::Result<()> {
    let summary = &report.summary;

    writeln!(out, "Job scan: {}", report.source_url)?;
    writeln!(out, "Scanned at: {}", report.scanned_at.to_rfc3339())?;
    writeln!(
        out,
        "Listings found: {} (positions analyzed: {})",
        summary.total_listings, positions_analyzed
    )?;

    if summary.total_listings == 0 {
        writeln!(out, "\nNo job listings matched the configured selectors")?;
        return Ok(());
    }

    writeln!(out, "\nDepartments")?;
    for entry in &summary.departments {
        writeln!(out, "- {}: {}", entry.label, entry.count)?;
    }

    writeln!(out, "\nLocations")?;
    for entry in &summary.locations {
        writeln!(out, "- {}: {}", entry.label, entry.count)?;
    }

    if summary.missing_title > 0 || summary.missing_url > 0 {
        writeln!(
            out,
            "\nIncomplete listings: {} without title, {} without link",
            summary.missing_title, summary.missing_url
        )?;
    }

    writeln!(out, "\nListings")?;
    for listing in &report.listings {
        let title = if listing.title.is_empty() {
            "(untitled)"
        } else {
            listing.title.as_str()
        };
        let posted = if listing.posting_date.is_empty() {
            String::new()
        } else {
            format!(" | posted {}", listing.posting_date)
        };
        let link = match &listing.url {
            Some(url) => format!(" | {url}"),
            None => String::new(),
        };
        writeln!(
            out,
            "- {} | {} | {}{}{}",
            title, listing.department, listing.location, posted, link
        )?;
    }

    Ok(())
}
