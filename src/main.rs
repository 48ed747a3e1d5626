use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sdbg::shell::Shell;
use sdbg_client::{ClientSettings, DebuggerClient};
use sdbg_config::{load_config, Config};
use sdbg_workspace::WorkspaceIndex;

/// Interactive client for a sandbox script-debugging session.
#[derive(Debug, Parser)]
#[command(name = "sdbg", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "sdbg.toml")]
    config: PathBuf,

    /// Attach on the server immediately instead of waiting for `connect`.
    #[arg(long)]
    attach: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("sdbg: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config =
        load_config(&cli.config).with_context(|| format!("load {}", cli.config.display()))?;
    init_logging(&config)?;

    let mut settings = ClientSettings::new(
        config.server.hostname.clone(),
        config.server.username.clone(),
        config.server.password.clone(),
    );
    settings.timeout = Duration::from_secs(config.server.timeout_secs);
    settings.trace = config.trace;

    let index = WorkspaceIndex::build(&config.workspace.roots, &config.workspace.exclude);
    info!(
        "workspace index holds {} script file(s) across {} root(s)",
        index.len(),
        config.workspace.roots.len()
    );

    let client = DebuggerClient::new(&settings)?;
    let mut shell = Shell::new(
        client,
        index,
        config.workspace.roots.clone(),
        config.server.hostname.clone(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start runtime")?;
    runtime.block_on(shell.run(cli.attach))
}

/// Direct tracing output to a log file so it never interleaves with the
/// shell's own output.
fn init_logging(config: &Config) -> Result<()> {
    let path = config
        .log
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from("sdbg.log"));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log.level.as_filter()))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
