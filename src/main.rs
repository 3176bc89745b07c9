//! Main application entry point (CLI binary).
//!
//! A thin native shell around the `domain_flag` library: it plays a browser
//! with a single tab, runs the flag and popup flows for that tab, and prints
//! what the extension would show.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

use domain_flag::initialization::init_logger_with;
use domain_flag::shell::Shell;
use domain_flag::{registrable_domain, Config, JsonFileStore, KeyValueStore, ReloadOutcome};

/// Locate the server behind a URL and draw its flag.
#[derive(Debug, Parser)]
#[command(name = "domain_flag", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    config: Config,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Set the flag for a URL and print the action title
    Flag {
        url: String,
        /// Ignore the cached record
        #[arg(long)]
        refetch: bool,
        /// Write the rendered 64x64 icon to this PNG file
        #[arg(long)]
        icon_out: Option<PathBuf>,
    },
    /// Print the popup for a URL
    Popup {
        url: String,
        /// Press the reload button after opening
        #[arg(long)]
        reload: bool,
        /// Hold the command modifier while pressing reload
        #[arg(long, requires = "reload")]
        donate: bool,
    },
    /// Treat the URL's domain as a local resource
    MarkLocal { url: String },
    /// Stop treating the URL's domain as local and look it up again
    UnmarkLocal { url: String },
    /// Drop every cached domain record
    ClearCache,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger_with(
        cli.config.log_level.clone().into(),
        cli.config.log_format.clone(),
    ) {
        eprintln!("domain_flag error: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "domain_flag error:".red(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config;
    match cli.command {
        Command::Flag {
            url,
            refetch,
            icon_out,
        } => {
            let shell = Shell::from_config(&config, &normalize_url(&url), icon_out.as_deref())?;
            let record = shell.flags.set_flag(shell.tabs.tab(), refetch).await?;
            println!("{}", shell.action.title().unwrap_or_default());
            if let Some(record) = record {
                log::debug!("Record: {}", serde_json::to_string(&record)?);
            }
            if let Some(path) = icon_out {
                println!("Icon written to {}", path.display());
            }
        }
        Command::Popup {
            url,
            reload,
            donate,
        } => {
            let shell = Shell::from_config(&config, &normalize_url(&url), None)?;
            let view = shell.popup.open().await?;
            if view.animation.is_some() {
                println!("{}", "✨".yellow());
            }
            print!("{view}");
            if reload {
                match shell.popup.reload(donate).await? {
                    ReloadOutcome::Reloaded(view) => print!("{view}"),
                    ReloadOutcome::OpenedDonation => {
                        for url in shell.tabs.opened() {
                            println!("{url}");
                        }
                    }
                }
            }
        }
        Command::MarkLocal { url } => set_local(&config, &url, true).await?,
        Command::UnmarkLocal { url } => set_local(&config, &url, false).await?,
        Command::ClearCache => {
            let store = JsonFileStore::new(&config.store_path, None);
            store
                .clear()
                .await
                .with_context(|| format!("Failed to clear {}", config.store_path.display()))?;
            println!("Cleared {}", config.store_path.display());
        }
    }
    Ok(())
}

async fn set_local(config: &Config, url: &str, local: bool) -> Result<()> {
    let url = normalize_url(url);
    let domain = registrable_domain(Some(&url))
        .with_context(|| format!("{url} has no domain to mark"))?;
    let shell = Shell::from_config(config, &url, None)?;

    let current = shell.flags.cache().get_domain(&domain).await?;
    if current.is_some_and(|record| record.is_local) == local {
        println!("{domain} is already {}", if local { "local" } else { "not local" });
        return Ok(());
    }
    let view = shell.popup.toggle_local().await?;
    print!("{view}");
    Ok(())
}

/// Adds `https://` to bare host names; URLs with a scheme are kept as is.
fn normalize_url(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
