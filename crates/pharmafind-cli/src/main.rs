//! pharmafind - PubMed papers with pharmaceutical/biotech company authors
//!
//! Searches PubMed, keeps articles with at least one company-affiliated
//! author, and prints them as CSV.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "pharmafind")]
#[command(
    about = "Fetch PubMed papers with non-academic authors from pharmaceutical/biotech companies"
)]
#[command(version)]
struct Cli {
    /// PubMed query (full PubMed search syntax)
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    query: String,

    /// Print debug information during execution
    #[arg(short, long)]
    debug: bool,

    /// Save results as CSV to this file (default: print to stdout)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Config file path (default: ./pharmafind.toml or ~/.config/pharmafind/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Spinner only on a TTY; logs route through it so they don't tear it
    let progress = pharmafind_core::ProgressContext::new();
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    pharmafind_core::init_logging(cli.debug, multi);

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    let pubmed_config = pharmafind_pubmed::Config::from(&config.pubmed);

    let pb = progress.stage_line("pubmed");
    let records = pharmafind_pubmed::get_papers(&pubmed_config, &cli.query, &pb);
    pb.finish_and_clear();

    let outcome = pharmafind_pubmed::write_output(&records, cli.file.as_deref());
    if let Some(message) = outcome.message() {
        eprintln!("{message}");
    }

    Ok(())
}
