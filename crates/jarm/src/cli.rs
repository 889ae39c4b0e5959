//! Clap derive structures for the `jarm` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// jarm -- query and control a JARM monitoring backend
#[derive(Debug, Parser)]
#[command(
    name = "jarm",
    version,
    about = "Query and control a JARM monitoring backend",
    long_about = "One-shot commands against the JARM backend: system status, monitoring\n\
        control, alerts, notifications, processes, analytics, tasks, diagnostics and\n\
        data export.\n\n\
        For the live dashboard, run jarm-tui.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "JARM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "JARM_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "JARM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "JARM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (profile default: 15)
    #[arg(long, env = "JARM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show whether monitoring is running and which agents are up
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Start or stop backend monitoring
    #[command(alias = "mon")]
    Monitor(MonitorArgs),

    /// List and create tasks
    Tasks(TasksArgs),

    /// List active alerts
    Alerts,

    /// List notifications and mark them read
    #[command(alias = "notif")]
    Notifications(NotificationsArgs),

    /// Top processes by memory
    #[command(alias = "ps")]
    Processes(ProcessesArgs),

    /// Task, alert and learning analytics
    Analytics(AnalyticsArgs),

    /// Recorded monitoring sessions and their applications
    History,

    /// Backend runtime, threshold and store diagnostics
    #[command(alias = "diag")]
    Diagnostics,

    /// Per-agent statistics
    Stats(StatsArgs),

    /// Export stored data
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Check the liveness endpoint instead
    #[arg(long, conflicts_with = "ready")]
    pub health: bool,

    /// Check database readiness; exits non-zero when not ready
    #[arg(long)]
    pub ready: bool,
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    #[command(subcommand)]
    pub command: MonitorCommand,
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommand {
    /// Start monitoring
    Start {
        /// Sampling interval in seconds (server clamps to 1-60)
        #[arg(long, short = 'i')]
        interval: Option<u32>,
    },

    /// Stop monitoring
    Stop,
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List recent tasks
    #[command(alias = "ls")]
    List {
        /// Max tasks to return (server clamps to 1-1000)
        #[arg(long, short = 'l', default_value = "10")]
        limit: u32,
    },

    /// Create a task
    Create {
        /// Task name (required)
        #[arg(long)]
        name: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Command line the task runs
        #[arg(long, default_value = "")]
        command: String,
    },

    /// Show the allow / warn / block verdict for a task
    Decision {
        /// Task ID
        task_id: u64,
    },

    /// Explain how the learning agent judged a task
    Explain {
        /// Task ID
        task_id: u64,
    },
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications
    #[command(alias = "ls")]
    List {
        /// Only show unread notifications
        #[arg(long, short = 'u')]
        unread: bool,
    },

    /// Mark one notification read
    Read {
        /// Notification ID
        id: u64,
    },

    /// Mark every notification read
    ReadAll,
}

// ── Processes / Analytics ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProcessesArgs {
    #[command(subcommand)]
    pub command: Option<ProcessesCommand>,

    /// Number of processes to show
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: u32,
}

#[derive(Debug, Subcommand)]
pub enum ProcessesCommand {
    /// Files a process holds open
    Files {
        /// Process ID
        pid: u32,

        /// Max paths to return (server default: 50)
        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },
}

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Look-back window in days
    #[arg(long, short = 'd', default_value = "30")]
    pub days: u32,
}

// ── Export ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub command: ExportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// SQL dump of stored metrics
    Metrics {
        /// Look-back window in hours (1-168)
        #[arg(long, default_value = "24")]
        hours: u32,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// CSV of every stored task
    Tasks {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// CSV of every stored alert
    Alerts {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ── Stats ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Task count per category
    Tasks,

    /// Learning agent state and visit counts
    Learning,

    /// Alert totals from the security agent
    Security,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
