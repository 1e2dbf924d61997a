// Output format auto-detection for the CLI.
//
// TTY → human-readable text. Piped/redirected → structured JSON.
// `--json` flag forces JSON output regardless of terminal.

use reqbook_core::host::{Notice, NoticeLevel};
use reqbook_core::store::StoreError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use crate::exit_code::{CliError, INVALID_REQUEST};

const ANSI_RED: &str = "\x1b[31m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (trees, labels, etc.).
    Human,
    /// Machine-readable JSON (one object per response).
    Json,
}

impl OutputFormat {
    /// Auto-detect format: JSON if `--json` was passed or stdout is not a TTY.
    pub fn detect(json_flag: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        Self::detect_from_terminal(io::stdout().is_terminal())
    }

    /// Testable variant that takes an explicit `is_tty` flag.
    pub fn detect_from_terminal(is_tty: bool) -> Self {
        if is_tty {
            Self::Human
        } else {
            Self::Json
        }
    }
}

/// Write a value to stdout in the selected format.
pub fn print_output<T, F>(format: OutputFormat, value: &T, human_fn: F) -> io::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let mut out = io::stdout().lock();
    write_output(&mut out, format, value, human_fn)
}

/// Write a value to a provided writer (useful for testing).
pub fn write_output<W, T, F>(
    writer: &mut W,
    format: OutputFormat,
    value: &T,
    human_fn: F,
) -> io::Result<()>
where
    W: Write,
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Human => {
            writeln!(writer, "{}", human_fn(value))
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, value).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

/// Write an error to stderr in the selected format.
pub fn print_error(format: OutputFormat, code: &str, message: &str) {
    let mut err = io::stderr().lock();
    let _ = write_stderr_entry(&mut err, format, "error", code, message, io::stderr().is_terminal());
}

/// Write a host notice to stderr. Stdout stays reserved for command output
/// and the session bridge.
pub fn print_notice(format: OutputFormat, notice: &Notice) {
    let label = match notice.level {
        NoticeLevel::Info => "notice",
        NoticeLevel::Error => "error",
    };
    let mut err = io::stderr().lock();
    let _ = write_stderr_entry(
        &mut err,
        format,
        label,
        "NOTICE",
        &notice.message,
        io::stderr().is_terminal(),
    );
}

/// Print a mapped, actionable error for a command failure.
pub fn print_anyhow_error(format: OutputFormat, error: &anyhow::Error) {
    let (code, message) = actionable_error(error);
    print_error(format, code, &message);
}

fn write_stderr_entry<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    label: &str,
    code: &str,
    message: &str,
    is_tty: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Human => {
            let color = if label == "error" { ANSI_RED } else { ANSI_CYAN };
            writeln!(writer, "{}", render_human_stderr_line(label, message, is_tty, color))
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                label: {
                    "code": code,
                    "message": message,
                }
            });
            serde_json::to_writer(&mut *writer, &obj).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

fn actionable_error(error: &anyhow::Error) -> (&'static str, String) {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return (cli_err.code, message);
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            let code = match store_err {
                StoreError::Read { .. } => "STORE_READ_FAILED",
                StoreError::CreateDir { .. } | StoreError::Write { .. } => "STORE_WRITE_FAILED",
                StoreError::Encode { .. } => "STORE_ENCODE_FAILED",
            };
            return (code, message);
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return (
                INVALID_REQUEST,
                format!("{message}. Expected a JSON object such as {{\"method\":\"GET\",\"url\":\"https://…\"}}"),
            );
        }
    }

    ("ERROR", message)
}

fn render_human_stderr_line(label: &str, message: &str, is_tty: bool, color: &str) -> String {
    if is_tty {
        format!("{color}{label}:{ANSI_RESET} {message}")
    } else {
        format!("{label}: {message}")
    }
}
