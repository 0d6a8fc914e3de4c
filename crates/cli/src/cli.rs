use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use infragraph_codegen::{BlockOrdering, ResourceKind};
use miette::Diagnostic;
use thiserror::Error;

use crate::commands::{Command, GenerateArgs, OutputFormat};
use crate::tracing::LogLevel;

/// Success exit code
pub const EXIT_OK: i32 = 0;
/// Generation succeeded with warnings under `--strict`, or `check` found errors
pub const EXIT_FINDINGS: i32 = 1;
/// CLI, configuration or input error exit code
pub const EXIT_CLI: i32 = 2;
/// Filesystem error exit code
pub const EXIT_IO: i32 = 3;

/// CLI-specific error types with exit code mapping
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Invalid invocation (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(infragraph::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// Error from the generator (exit code 2, or 3 for IO)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] infragraph_codegen::Error),

    /// Reading input or writing output failed (exit code 3)
    #[error("Failed to {operation} {path}: {source}")]
    #[diagnostic(code(infragraph::cli::io))]
    Io {
        /// What was being done
        operation: &'static str,
        /// File involved
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Create a configuration error with help text.
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Exit code for an error
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Codegen(infragraph_codegen::Error::Io(_)) | CliError::Io { .. } => EXIT_IO,
        CliError::Codegen(_) => EXIT_CLI,
    }
}

#[derive(Parser, Debug)]
#[command(name = "infragraph")]
#[command(about = "Turn a visual cloud-resource graph into Terraform configuration")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,
}

/// Block ordering as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderingArg {
    /// Canvas order
    Input,
    /// Upstream resources first
    Dependency,
}

impl From<OrderingArg> for BlockOrdering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::Input => Self::Input,
            OrderingArg::Dependency => Self::Dependency,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Generate Terraform from a graph snapshot")]
    Generate {
        #[arg(help = "Snapshot JSON file, or - for stdin", default_value = "-")]
        input: String,
        #[arg(long, short = 'o', help = "Write output to this file instead of stdout")]
        output: Option<PathBuf>,
        #[arg(
            long,
            env = "INFRAGRAPH_CONFIG",
            help = "Generator configuration file (TOML)"
        )]
        config: Option<PathBuf>,
        #[arg(long, value_enum, help = "Override the configured block ordering")]
        ordering: Option<OrderingArg>,
        #[arg(long, value_enum, default_value = "hcl", help = "Output format")]
        format: OutputFormat,
        #[arg(long, help = "Exit non-zero when any node was skipped")]
        strict: bool,
    },
    #[command(about = "Print the resource schema registry as JSON")]
    Schema {
        #[arg(help = "Only print the schema for this kind")]
        kind: Option<ResourceKind>,
    },
    #[command(about = "Check node properties against the schema registry")]
    Check {
        #[arg(help = "Snapshot JSON file, or - for stdin", default_value = "-")]
        input: String,
    },
    #[command(about = "Print the JSON Schema of the graph snapshot format")]
    InputSchema,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Generate {
                input,
                output,
                config,
                ordering,
                format,
                strict,
            } => Self::Generate(GenerateArgs {
                input,
                output,
                config,
                ordering: ordering.map(Into::into),
                format,
                strict,
            }),
            Commands::Schema { kind } => Self::Schema { kind },
            Commands::Check { input } => Self::Check { input },
            Commands::InputSchema => Self::InputSchema,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
