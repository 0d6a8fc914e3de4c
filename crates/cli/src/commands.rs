//! Command execution.
//!
//! Commands return what should go to stdout plus an exit code; `main` does
//! the printing so everything here can run against in-memory input.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use infragraph_codegen::{
    BlockOrdering, Generator, GeneratorConfig, GraphSnapshot, ResourceKind, all_schemas,
    check_snapshot, schema,
};

use crate::cli::{CliError, EXIT_FINDINGS, EXIT_OK};

const STDIN_MARKER: &str = "-";

/// Format of `generate` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terraform text
    Hcl,
    /// Text, warnings and block count as JSON
    Json,
}

/// Arguments of `generate`
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub ordering: Option<BlockOrdering>,
    pub format: OutputFormat,
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub enum Command {
    Generate(GenerateArgs),
    Schema { kind: Option<ResourceKind> },
    Check { input: String },
    InputSchema,
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Text for stdout, if any
    pub stdout: Option<String>,
    /// Process exit code
    pub exit_code: i32,
}

impl CommandOutput {
    fn print(text: String) -> Self {
        Self {
            stdout: Some(text),
            exit_code: EXIT_OK,
        }
    }
}

/// Run `command`, reading `-` inputs from `stdin`.
#[tracing::instrument(skip(stdin), fields(correlation_id = %crate::tracing::correlation_id()))]
pub fn execute(command: Command, stdin: impl Read) -> Result<CommandOutput, CliError> {
    match command {
        Command::Generate(args) => generate(args, stdin),
        Command::Schema { kind } => print_schema(kind),
        Command::Check { input } => check(&input, stdin),
        Command::InputSchema => input_schema(),
    }
}

fn generate(args: GenerateArgs, stdin: impl Read) -> Result<CommandOutput, CliError> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(ordering) = args.ordering {
        config.ordering = ordering;
    }

    let text = read_input(&args.input, stdin)?;
    let output = Generator::new(config).generate_json(&text)?;

    let rendered = match args.format {
        OutputFormat::Hcl => format!("{}\n", output.text),
        OutputFormat::Json => format!("{}\n", to_pretty_json(&output)?),
    };
    let exit_code = if args.strict && !output.warnings.is_empty() {
        tracing::error!(
            warnings = output.warnings.len(),
            "Generation skipped part of the graph"
        );
        EXIT_FINDINGS
    } else {
        EXIT_OK
    };

    match &args.output {
        Some(path) => {
            write_output(path, &rendered)?;
            tracing::info!(
                path = %path.display(),
                blocks = output.blocks,
                "Wrote Terraform configuration"
            );
            Ok(CommandOutput {
                stdout: None,
                exit_code,
            })
        }
        None => Ok(CommandOutput {
            stdout: Some(rendered),
            exit_code,
        }),
    }
}

fn print_schema(kind: Option<ResourceKind>) -> Result<CommandOutput, CliError> {
    let json = match kind {
        Some(kind) => to_pretty_json(schema(kind))?,
        None => to_pretty_json(all_schemas())?,
    };
    Ok(CommandOutput::print(format!("{json}\n")))
}

fn check(input: &str, stdin: impl Read) -> Result<CommandOutput, CliError> {
    let snapshot = GraphSnapshot::from_json(&read_input(input, stdin)?)?;
    let report = check_snapshot(&snapshot);
    let exit_code = if report.is_compliant() {
        EXIT_OK
    } else {
        EXIT_FINDINGS
    };
    Ok(CommandOutput {
        stdout: Some(format!("{}\n", to_pretty_json(&report)?)),
        exit_code,
    })
}

fn input_schema() -> Result<CommandOutput, CliError> {
    let schema = schemars::schema_for!(GraphSnapshot);
    Ok(CommandOutput::print(format!("{}\n", to_pretty_json(&schema)?)))
}

fn read_input(input: &str, mut stdin: impl Read) -> Result<String, CliError> {
    let text = if input == STDIN_MARKER {
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .map_err(|e| CliError::io("read", "stdin", e))?;
        text
    } else {
        std::fs::read_to_string(input).map_err(|e| CliError::io("read", input, e))?
    };

    if text.trim().is_empty() {
        return Err(CliError::config_with_help(
            format!("no graph snapshot in {}", display_input(input)),
            "Pass a snapshot file path or pipe the editor's JSON export on stdin",
        ));
    }
    Ok(text)
}

fn write_output(path: &Path, text: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::io("create", parent.display().to_string(), e))?;
    }
    std::fs::write(path, text).map_err(|e| CliError::io("write", path.display().to_string(), e))
}

fn display_input(input: &str) -> &str {
    if input == STDIN_MARKER { "stdin" } else { input }
}

fn to_pretty_json(value: &(impl serde::Serialize + ?Sized)) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Codegen(infragraph_codegen::Error::Json(e)))
}
