//! Pyrite CLI: compiles, caches and runs Pyrite scripts.
//!
//! Provides `pyrite run` to execute a script, `pyrite compile` to write its
//! bytecode container, `pyrite exec` to run a container without the source,
//! and `pyrite dis` to print the compiled bytecode.

#![warn(missing_docs)]

mod compile;
mod run;
mod session;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

/// Pyrite, a small Python-flavoured bytecode compiler.
#[derive(Parser, Debug)]
#[command(name = "pyrite", version, about = "Pyrite bytecode compiler")]
pub struct Cli {
    /// Suppress all diagnostics except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) diagnostics.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `pyrite.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile and execute a script.
    Run {
        /// Script to run.
        script: String,
    },
    /// Compile a script and write its bytecode container.
    Compile(CompileArgs),
    /// Execute a bytecode container without its source.
    Exec {
        /// Container file to run.
        container: String,
    },
    /// Print the compiled bytecode of a script.
    Dis {
        /// Script to disassemble.
        script: String,
    },
    /// Print version information.
    Version,
}

/// Arguments for the `pyrite compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Script to compile.
    pub script: String,

    /// Directory for the container (default: the cache directory beside the
    /// script).
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// How to report the written container.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// The container path only.
    Text,
    /// A JSON object with the path and header fields.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error diagnostics.
    pub quiet: bool,
    /// Whether to print debug diagnostics.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Diagnostic level implied by `--quiet` and `--verbose`.
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    tracing_subscriber::fmt()
        .with_max_level(global.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Command::Run { ref script } => run::run_script(script, &global),
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Exec { ref container } => run::run_container(container, &global),
        Command::Dis { ref script } => compile::disassemble(script, &global),
        Command::Version => {
            println!(
                "pyrite {} ({})",
                env!("CARGO_PKG_VERSION"),
                pyrite_bytecode::IMPLEMENTATION_TAG
            );
            Ok(0)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
