// Consistent exit codes for the reqbook CLI.
//
//   0  = success
//   1  = general error
//   2  = usage/argument error (including unreadable request input)
//   3  = request not found
//   4  = no project open for a project-scoped operation
//   5  = store I/O failure

use std::process;

use reqbook_core::store::StoreError;

/// Named exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    NotFound = 3,
    NoProject = 4,
    Storage = 5,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(cli_err) = cause.downcast_ref::<CliError>() {
                return Self::from_cli_code(cli_err.code);
            }
            if cause.downcast_ref::<StoreError>().is_some() {
                return Self::Storage;
            }
            if cause.downcast_ref::<serde_json::Error>().is_some() {
                return Self::Usage;
            }
        }
        Self::Error
    }

    /// Map a CLI error code string to an exit code.
    pub fn from_cli_code(code: &str) -> Self {
        match code {
            NOT_FOUND => Self::NotFound,
            NO_PROJECT => Self::NoProject,
            INVALID_REQUEST => Self::Usage,
            _ => Self::Error,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const NO_PROJECT: &str = "NO_PROJECT";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// A typed CLI error that can be embedded in an `anyhow::Error` chain.
#[derive(Debug)]
pub struct CliError {
    pub code: &'static str,
    pub message: String,
}

impl CliError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}
