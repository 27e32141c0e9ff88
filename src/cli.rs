use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::session::RunSummary;
use crate::tools::config::{DEFAULT_CONCURRENCY, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_SEARCH_URL};
use crate::tools::{HarvestConfig, RunConfig};

/// Find a best-guess company website for every row of a spreadsheet.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Spreadsheet with account name, an ignored column and address (.xlsx, .xls, .ods or .csv)
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Results CSV; truncated on start
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Entities resolved at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Search endpoint; the query is sent as `q`
    #[arg(long, default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// Override the browser user agent
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors, no progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn harvest_config(&self) -> HarvestConfig {
        let defaults = HarvestConfig::default();
        HarvestConfig {
            search_url: self.search_url.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout_seconds: self.timeout_secs,
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            input_path: self.input.clone(),
            output_path: self.output.clone(),
            max_concurrency: self.concurrency,
            show_progress: !self.quiet,
        }
    }
}

pub fn entity_progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ");
    bar.set_style(style);
    bar
}

pub fn print_summary(summary: &RunSummary, output: &std::path::Path) {
    println!();
    println!("{}", "Enrichment finished".cyan().bold());
    println!("  {} {}", "Entities:".blue(), summary.processed);
    println!("  {} {}", "URLs found:".blue(), summary.found.to_string().green());
    if summary.failed > 0 {
        println!(
            "  {} {}",
            "Failed lookups:".blue(),
            summary.failed.to_string().red()
        );
    }
    println!("  {} {}", "Results:".blue(), output.display());
}
