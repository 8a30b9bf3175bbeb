///
/// This module implements the CLI interface for division-bot: command parsing,
/// wiring the HTTP clients to the core pipeline, and the user-visible summary.
///
/// All division, tally and report logic lives in the [`division-bot-core`] crate.
/// This module is CLI glue only.
///
/// ## How To Use
/// - From the command line: `division-bot sync --config bot.yaml [--chamber lords]`.
/// - Programmatically or from integration tests: call [`run`] with a constructed [`Cli`].
///
/// [`division-bot-core`]: ../../division-bot-core/
use crate::cursor_file::FileCursorStore;
use crate::load_config::{load_config, Config, CursorConfig};
use crate::parliament::{BillsClient, CommonsVotesClient, LordsVotesClient, MembersClient};
use crate::tumblr::{PostCursorStore, TumblrClient};
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use division_bot_core::commons::CommonsSource;
use division_bot_core::contract::{CursorStore, DivisionSource};
use division_bot_core::lords::LordsSource;
use division_bot_core::synchronise::{synchronise, ChamberOutcome, ChamberReport};
use division_bot_core::Chamber;
use std::path::PathBuf;

/// CLI for division-bot: publish UK Parliament division results to Tumblr.
#[derive(Parser)]
#[clap(
    name = "division-bot",
    version,
    about = "Publish the next unpublished Commons and Lords divisions as Tumblr posts"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the oldest unpublished division of each enabled chamber
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Only sync this chamber (commons or lords)
        #[clap(long)]
        chamber: Option<Chamber>,
    },
}

/// Chambers to run: the configured ones, or just the requested one if it is enabled.
pub fn select_chambers(enabled: &[Chamber], only: Option<Chamber>) -> Result<Vec<Chamber>> {
    match only {
        None => Ok(enabled.to_vec()),
        Some(chamber) if enabled.contains(&chamber) => Ok(vec![chamber]),
        Some(chamber) => bail!("Chamber `{chamber}` is not enabled in the config"),
    }
}

/// One line per chamber for the run summary.
pub fn summary_line(report: &ChamberReport) -> String {
    match &report.outcome {
        ChamberOutcome::UpToDate => {
            format!("{}: up to date (cursor {})", report.chamber, report.cursor_before)
        }
        ChamberOutcome::Published {
            division_id,
            post_id,
            remaining,
        } => format!(
            "{}: published division {} as post {}, {} remaining",
            report.chamber, division_id, post_id, remaining
        ),
    }
}

fn division_source(config: &Config, chamber: Chamber) -> Result<Box<dyn DivisionSource>> {
    let timeout = config.request_timeout;
    let members = MembersClient::new(&config.endpoints.members, timeout)
        .map_err(|e| anyhow!("Failed to build members client: {e}"))?;
    let source: Box<dyn DivisionSource> = match chamber {
        Chamber::Commons => {
            let api = CommonsVotesClient::new(&config.endpoints.commons_votes, timeout)
                .map_err(|e| anyhow!("Failed to build Commons votes client: {e}"))?;
            Box::new(CommonsSource::new(api, members))
        }
        Chamber::Lords => {
            let api = LordsVotesClient::new(&config.endpoints.lords_votes, timeout)
                .map_err(|e| anyhow!("Failed to build Lords votes client: {e}"))?;
            Box::new(LordsSource::new(api, members))
        }
    };
    Ok(source)
}

async fn cursor_store(config: &Config, tumblr: &TumblrClient) -> Result<Box<dyn CursorStore>> {
    let store: Box<dyn CursorStore> = match &config.cursor {
        CursorConfig::Post { post_id } => Box::new(
            PostCursorStore::load(tumblr.clone(), *post_id)
                .await
                .map_err(|e| anyhow!("Failed to load cursors from config post {post_id}: {e}"))?,
        ),
        CursorConfig::File { path } => Box::new(
            FileCursorStore::open(path).map_err(|e| anyhow!("Failed to open cursor file: {e}"))?,
        ),
    };
    Ok(store)
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config, chamber } => {
            let config = load_config(config)?;
            let chambers = select_chambers(&config.chambers, chamber)?;
            tracing::info!(command = "sync", ?chambers, "Starting synchronisation process");

            let tumblr = TumblrClient::new(
                &config.endpoints.tumblr,
                &config.blog,
                &config.tumblr_token,
            )
            .map_err(|e| anyhow!("Failed to build Tumblr client: {e}"))?;
            let bills = BillsClient::new(&config.endpoints.bills)
                .map_err(|e| anyhow!("Failed to build bills client: {e}"))?;
            let cursors = cursor_store(&config, &tumblr).await?;

            let sources = chambers
                .iter()
                .map(|chamber| division_source(&config, *chamber))
                .collect::<Result<Vec<_>>>()?;
            let sources: Vec<&dyn DivisionSource> = sources.iter().map(|s| s.as_ref()).collect();

            match synchronise(&sources, &bills, &tumblr, cursors.as_ref(), &config.tags).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    for chamber in &report.chambers {
                        println!("{}", summary_line(chamber));
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(e.into())
                }
            }
        }
    }
}
