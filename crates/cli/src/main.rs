//! `infragraph` binary: graph snapshots in, Terraform out.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod tracing;

use std::io::Write;

use crate::cli::{CliError, EXIT_CLI, exit_code_for};
use crate::commands::{Command, CommandOutput};
use crate::tracing::{TracingConfig, TracingFormat};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("infragraph panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    let json_mode = cli.json;

    let tracing_config = TracingConfig {
        format: if json_mode {
            TracingFormat::Json
        } else {
            std::env::var("INFRAGRAPH_LOG_FORMAT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(TracingFormat::Compact)
        },
        level: cli.level.into(),
    };
    if let Err(error) = crate::tracing::init_tracing(tracing_config) {
        eprintln!("{error:?}");
        std::process::exit(EXIT_CLI);
    }

    let command: Command = cli.command.into();
    let code = match commands::execute(command, std::io::stdin().lock()) {
        Ok(output) => print_output(output),
        Err(error) => report_error(error, json_mode),
    };
    std::process::exit(code);
}

fn print_output(output: CommandOutput) -> i32 {
    if let Some(text) = output.stdout {
        let mut stdout = std::io::stdout().lock();
        if let Err(error) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
            // A closed pipe is not worth a diagnostic.
            if error.kind() != std::io::ErrorKind::BrokenPipe {
                return report_error(CliError::io("write", "stdout", error), false);
            }
        }
    }
    output.exit_code
}

fn report_error(error: CliError, json_mode: bool) -> i32 {
    let code = exit_code_for(&error);
    if json_mode {
        let envelope = serde_json::json!({
            "status": "error",
            "error": {
                "message": error.to_string(),
                "code": code,
            }
        });
        eprintln!("{envelope}");
    } else {
        eprintln!("{:?}", miette::Report::new(error));
    }
    code
}
