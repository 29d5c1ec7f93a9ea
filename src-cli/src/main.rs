//! Report Designer - command-line tools for report canvas layouts
//!
//! Inspects and normalizes stored layout files and prints page render plans
//! for a layout filled with a dataset. Logs go to stderr; set `RUST_LOG` to
//! control verbosity.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = commands::load_settings(cli.settings_dir.as_deref())?;
    tracing::debug!(?settings, "loaded designer settings");

    let output = commands::run(cli.command, &settings)?;
    print!("{}", output);
    Ok(())
}
