//! `jarm-tui`: real-time terminal dashboard for a JARM backend.
//!
//! Built on [ratatui](https://ratatui.rs) over `jarm-core`'s `Dashboard`,
//! which merges the push channel, six poll cycles and the chart refresh
//! into one view. Logs go to a file (default `/tmp/jarm-tui.log`) so the
//! terminal is never corrupted.

mod action;
mod app;
mod event;
mod sink;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jarm_config::Profile;
use jarm_core::{Dashboard, DashboardConfig};

use crate::app::App;
use crate::sink::{TerminalSink, ToastLog};

/// Live terminal dashboard for the JARM monitoring backend.
#[derive(Parser, Debug)]
#[command(name = "jarm-tui", version, about)]
struct Cli {
    /// Backend URL (e.g. http://localhost:5000); overrides the profile
    #[arg(short = 's', long, env = "JARM_SERVER")]
    server: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "JARM_PROFILE")]
    profile: Option<String>,

    /// Stream refresh period in milliseconds
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Disable audio cues
    #[arg(long)]
    mute: bool,

    /// Poll only; never open the push channel
    #[arg(long)]
    no_push: bool,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/jarm-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Hold the guard for the app lifetime so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jarm_tui={level},jarm_core={level},jarm_api={level}")));

    let dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("jarm-tui.log"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Flags beat the config file; a profile is only needed without `--server`.
fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let cfg = jarm_config::load_config_or_default();

    let mut profile = match cli.server.as_deref() {
        Some(server) => Profile::for_server(server),
        None => jarm_config::resolve_profile(&cfg, cli.profile.as_deref())
            .map(|(_, profile)| profile.clone())
            .map_err(|e| {
                eyre!(
                    "{e}\nPass --server <URL> or add a profile to {}",
                    jarm_config::config_path().display()
                )
            })?,
    };

    if cli.insecure {
        profile.insecure = Some(true);
    }
    if cli.refresh_ms.is_some() {
        profile.refresh_ms = cli.refresh_ms;
    }
    if cli.mute {
        profile.audio = Some(false);
    }
    if cli.no_push {
        profile.push = Some(false);
    }

    jarm_config::profile_to_dashboard_config(&profile, &cfg.defaults)
        .wrap_err("invalid dashboard configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;
    info!(url = %config.url, push = config.push_enabled, "starting jarm-tui");

    let toasts = Arc::new(ToastLog::default());
    let sink = Arc::new(TerminalSink::new(config.audio_enabled, Arc::clone(&toasts)));
    let dashboard = Dashboard::new(config, sink).wrap_err("could not build backend client")?;

    App::new(dashboard, toasts).run().await
}
