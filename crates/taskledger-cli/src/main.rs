#![forbid(unsafe_code)]

mod cmd;
mod output;
mod platform;
mod tracker;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use taskledger_core::config::load_config;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "taskledger: daily work log reports",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Work log file (defaults to the configured path, else worklog.yml).
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Config file (defaults to $TASKLEDGER_CONFIG, else the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Total the hours logged",
        long_about = "Sum the time entries logged on the selected days.",
        after_help = "EXAMPLES:\n    # Hours across the whole log\n    taskledger hours\n\n    # Hours for one day\n    taskledger hours --start-date 2024-08-01\n\n    # Emit machine-readable output\n    taskledger hours --start-date 2024-08-01 --end-date 2024-08-07 --json"
    )]
    Hours(cmd::hours::HoursArgs),

    #[command(
        about = "Generate a work report",
        long_about = "Summarize completed, upcoming and blocked work over the selected days, \
                      optionally as an HTML document.",
        after_help = "EXAMPLES:\n    # Report over the whole log\n    taskledger report\n\n    # One week, saved as HTML and opened in the browser\n    taskledger report --start-date 2024-08-01 --end-date 2024-08-07 --html-file report.html --open-html\n\n    # Use pre-fetched ticket titles\n    taskledger report --copy-html --jira-summaries summaries.json"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        about = "Post progress comments to tickets",
        long_about = "Build one progress comment per referenced ticket and post it to the tracker. \
                      Tickets that already carry an identical comment are skipped.",
        after_help = "EXAMPLES:\n    # Preview the comments\n    taskledger comment --dry-run\n\n    # Post this week's update to one ticket\n    taskledger comment --start-date 2024-08-01 --end-date 2024-08-07 --ticket PROJ-101"
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        about = "Write a starter work log",
        long_about = "Write a sample work log for yesterday and today that shows every field and status.",
        after_help = "EXAMPLES:\n    # Create worklog.yml\n    taskledger init\n\n    # Replace an existing file\n    taskledger --file ~/notes/worklog.yml init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for taskledger.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    taskledger completions bash\n\n    # Generate zsh completions\n    taskledger completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TASKLEDGER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "taskledger=debug,info"
        } else {
            "taskledger=info,warn"
        })
    });

    let format = env::var("TASKLEDGER_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Reports go to stdout; keep logs out of them.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return cmd::completions::run_completions(args.shell, &mut Cli::command());
    }

    let config = load_config(cli.config.as_deref())?;
    let worklog_path = cli
        .file
        .clone()
        .unwrap_or_else(|| config.worklog.path.clone());
    debug!(worklog = %worklog_path.display(), "resolved work log path");

    let ctx = cmd::CommandContext {
        worklog_path,
        config,
        output: cli.output_mode(),
    };

    match &cli.command {
        Commands::Hours(args) => cmd::hours::run_hours(args, &ctx),
        Commands::Report(args) => cmd::report::run_report(args, &ctx),
        Commands::Comment(args) => cmd::comment::run_comment(args, &ctx),
        Commands::Init(args) => cmd::init::run_init(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(render_err) = render_error(output, &CliError::from_anyhow(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
