//! # CLI Behavior
//!
//! This is **one possible UI client** for folio. It is the only place that
//! knows about terminal I/O, exit codes and output formatting.
//!
//! ## Identifiers
//!
//! Every command that targets a document takes an optional identifier: a
//! full id, an id prefix, or the document's name. Leaving it out opens a
//! numbered picker on the terminal. `--parent` and `--after` accept the same
//! forms but search all kinds.
//!
//! Running `folio` with no subcommand lists workspaces.
//!
//! ## Logging
//!
//! Library diagnostics go through `tracing` to stderr. The default level is
//! `warn`; `-v` raises it to `debug` and `RUST_LOG` overrides both.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print
//! - `prompt`: Terminal implementation of the library's `Prompter`
//! - `render`: Output formatting
//! - `setup`: Argument parsing via clap

mod commands;
mod prompt;
mod render;
pub mod setup;

use anyhow::{Context, Result};
use clap::Parser;
use folioapp::api::FolioApi;
use folioapp::model::Kind;
use setup::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("folio={level},folioapp={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    tracing::debug!(root = %root.display(), "opening store");
    let mut api = FolioApi::open(&root).await?;

    match cli.command {
        None => commands::list(&api, Kind::Workspace, None),
        Some(Commands::List { kind, parent }) => commands::list(&api, kind, parent.as_deref()),
        Some(Commands::Show { kind, id }) => commands::show(&api, kind, id.as_deref()),
        Some(Commands::Create {
            kind,
            name,
            description,
            parent,
        }) => commands::create(&mut api, kind, name, description, parent.as_deref()),
        Some(Commands::Duplicate {
            kind,
            id,
            name,
            parent,
        }) => commands::duplicate(&mut api, kind, id.as_deref(), name, parent.as_deref()),
        Some(Commands::Move {
            kind,
            id,
            parent,
            after,
        }) => commands::move_doc(&mut api, kind, id.as_deref(), parent.as_deref(), after.as_deref()),
        Some(Commands::Remove { kind, id }) => commands::remove(&mut api, kind, id.as_deref()),
        Some(Commands::Rebalance { parent }) => commands::rebalance(&mut api, parent.as_deref()),
    }
}
