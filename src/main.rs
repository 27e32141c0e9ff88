use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::{print_summary, Args},
    session::EnrichmentSession,
    tools::{logging, SearchHarvester},
};

pub mod api_models;
pub mod cli;
pub mod session;
pub mod tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    let run_config = args.run_config();
    let harvester = SearchHarvester::new(args.harvest_config())
        .context("could not set up the search client")?;

    let session = EnrichmentSession::new(Arc::new(harvester), run_config.clone());
    let summary = session.run().await.map_err(|e| {
        eprintln!("{} {}", "✗".red(), e.to_user_message());
        e
    })?;

    if !args.quiet {
        print_summary(&summary, &run_config.output_path);
    }
    Ok(())
}
