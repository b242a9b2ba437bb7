use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, CourseListController, FetchOutcome};
use shared::error::FetchFailure;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{Command, HELP};

#[derive(Parser, Debug)]
#[command(about = "Browse the paginated course listing from a terminal")]
struct Args {
    /// Settings file; defaults to ./courses.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    per_page: Option<u32>,
    /// Initial ordering key, `-field` for descending.
    #[arg(long)]
    ordering: Option<String>,
    /// Initial search text, applied right after the first page loads.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    session_cookie: Option<String>,
    /// Print the first page and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courses=info,client_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(per_page) = args.per_page {
        settings.per_page = per_page;
    }
    if let Some(ordering) = args.ordering {
        settings.ordering = ordering;
    }
    if let Some(cookie) = args.session_cookie {
        settings.session_cookie = Some(cookie);
    }
    settings.validate().context("invalid course browser settings")?;

    let controller = CourseListController::from_settings(&settings)?;
    info!(base_url = %settings.base_url, "mounting course list");
    report(controller.mount().await);

    if let Some(search) = args.search {
        report(controller.set_search_query(search).await);
    }

    if args.once {
        return Ok(());
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        debug!(?command, "command received");

        let outcome = match command {
            Command::Search(text) => controller.set_search_query(text).await,
            Command::Sort(field) => controller.toggle_ordering(field).await,
            Command::PerPage(per_page) => controller.set_per_page(per_page).await,
            Command::Page(page) => controller.set_current_page(page).await,
            Command::Next => {
                let snapshot = controller.snapshot().await;
                controller
                    .set_current_page(snapshot.current_page.saturating_add(1))
                    .await
            }
            Command::Prev => {
                let snapshot = controller.snapshot().await;
                controller
                    .set_current_page(snapshot.current_page.saturating_sub(1))
                    .await
            }
            Command::Refresh => controller.refresh().await,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };
        report(outcome);
    }

    Ok(())
}

fn report(outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Committed(snapshot) => println!("{}", render::render_page(&snapshot)),
        FetchOutcome::Failed(FetchFailure { kind, message }) => {
            eprintln!("Loading courses failed ({kind:?}): {message}; showing the last loaded page");
        }
        FetchOutcome::Superseded => {}
        FetchOutcome::Unchanged => eprintln!("nothing to load for that request"),
    }
}
