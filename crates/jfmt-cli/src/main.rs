mod clipboard;
mod cmd_buffer;
mod cmd_config;
mod cmd_copy;
mod cmd_format;
mod cmd_history;
mod cmd_validate;
mod io;

use clap::{Parser, Subcommand};
use cmd_buffer::BufferCmd;
use cmd_config::ConfigCmd;
use cmd_history::HistoryCmd;
use io::InputArgs;
use jfmt_core::Mode;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "JFMT_LOG";

#[derive(Parser)]
#[command(name = "jfmt", version, about = "Format, compress and repair JSON")]
struct Cli {
    /// Store directory (defaults to $JFMT_HOME or the platform data dir)
    #[arg(long, global = true)]
    home: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pretty-print JSON with four-space indentation
    Format {
        #[command(flatten)]
        input: InputArgs,
        /// Export the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Minify JSON
    Compress {
        #[command(flatten)]
        input: InputArgs,
        /// Export the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check JSON strictly, without repair
    Validate {
        #[command(flatten)]
        input: InputArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show root type and size
    Info {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Copy text to the clipboard
    Copy {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Saved editor buffer operations
    Buffer {
        #[command(subcommand)]
        cmd: BufferCmd,
    },
    /// History operations (list, show, load, delete, clear)
    History {
        #[command(subcommand)]
        cmd: HistoryCmd,
    },
    /// Manage settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
    /// Own the clipboard for `copy` (reads the text from stdin)
    #[command(name = clipboard::SERVE_ARG, hide = true)]
    ClipboardServe,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .with(env_filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let root = cli.home.unwrap_or_else(jfmt_store::store_root);
    tracing::debug!(root = %root.display(), "store root");

    match cli.cmd {
        Command::Format { input, output } => {
            cmd_format::execute(&root, &input, output.as_deref(), Mode::Format)
        }
        Command::Compress { input, output } => {
            cmd_format::execute(&root, &input, output.as_deref(), Mode::Compress)
        }
        Command::Validate { input, json } => cmd_validate::validate_cmd(&root, &input, json),
        Command::Info { input } => cmd_validate::info(&root, &input),
        Command::Copy { input } => cmd_copy::execute(&root, &input),
        Command::Buffer { cmd } => cmd_buffer::run(cmd, &root),
        Command::History { cmd } => cmd_history::run(cmd, &root),
        Command::Config { cmd } => cmd_config::run(cmd, &root),
        Command::ClipboardServe => cmd_copy::serve(),
    }
}
