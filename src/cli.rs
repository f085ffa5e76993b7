use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "db-connect-audit")]
#[command(author, version, about = "Notify a chat channel about new database connections", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, value_enum, default_value = "info", help = "Log verbosity")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Process a batch of log lines and send a notification per new connection")]
    Process {
        #[arg(short, long, help = "Input file: raw log lines, or a subscription event with --envelope")]
        input: String,

        #[arg(long, help = "Treat the input as a CloudWatch Logs subscription event")]
        envelope: bool,

        #[arg(short, long, value_enum, default_value = "auto", help = "Database engine that wrote the log")]
        engine: EngineArg,

        #[arg(
            long,
            help = "Incoming-webhook URL. Can also be set via SLACK_WEBHOOK_URL env var"
        )]
        webhook_url: Option<String>,

        #[arg(
            long,
            help = "Cluster name shown in notifications. Can also be set via AURORA_CLUSTER_ID env var"
        )]
        cluster_id: Option<String>,

        #[arg(long, help = "Print notifications instead of sending them")]
        dry_run: bool,

        #[arg(short, long, value_enum, help = "Output format")]
        output: Option<OutputFormat>,
    },

    #[command(about = "Extract the connection event from a single log line")]
    Extract {
        #[arg(help = "Log line to parse")]
        line: String,

        #[arg(short, long, value_enum, default_value = "auto", help = "Database engine that wrote the line")]
        engine: EngineArg,

        #[arg(short, long, value_enum, help = "Output format")]
        output: Option<OutputFormat>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    Auto,
    Postgresql,
    Mysql,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
