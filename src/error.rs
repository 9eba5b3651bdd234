use crate::config::ConfigError;
use crate::filter::{FilterParseError, UnknownFieldsError};
use crate::source::SourceError;
use colored::Colorize;
use thiserror::Error;

/// Exit status for usage, input and parse failures
pub const EXIT_FAILURE: u8 = 1;
/// Exit status when a referenced field is not in the header
pub const EXIT_UNKNOWN_FIELD: u8 = 2;

/// Every way a run can end early
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Filter(#[from] FilterParseError),

    #[error(transparent)]
    UnknownFields(#[from] UnknownFieldsError),

    #[error("Error writing output: {0}")]
    Output(#[source] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            // --help and --version come through clap's error path too
            AppError::Usage(err) if !err.use_stderr() => 0,
            AppError::UnknownFields(_) => EXIT_UNKNOWN_FIELD,
            _ => EXIT_FAILURE,
        }
    }

    /// Print the error for the user
    pub fn report(&self) {
        match self {
            AppError::Usage(err) => {
                let _ = err.print();
            }
            AppError::UnknownFields(err) => {
                for field in &err.fields {
                    eprintln!(
                        "{} Field '{}' does not exist in the file header",
                        "error:".red().bold(),
                        field
                    );
                }
                eprintln!("Use --list-fields to see the available fields.");
            }
            other => eprintln!("{} {}", "error:".red().bold(), other),
        }
    }
}
