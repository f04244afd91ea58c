//! CLI error types.

use std::fmt;

use error_stack::Report;
use quizcall_common::error::{ErrorStage, QuestionError};

#[derive(Debug)]
pub enum CliError {
    /// Configuration file error
    Config(String),
    /// Signed question pipeline error
    Request { stage: ErrorStage, message: String },
    /// IO error
    Io(std::io::Error),
    /// Output serialization error
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Request { stage, message } => {
                write!(f, "Request failed at {} stage: {}", stage, message)
            }
            CliError::Io(err) => write!(f, "IO error: {}", err),
            CliError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<Report<QuestionError>> for CliError {
    fn from(report: Report<QuestionError>) -> Self {
        log::debug!("{:?}", report);
        match report.current_context() {
            QuestionError::Configuration { message } => CliError::Config(message.clone()),
            context => CliError::Request {
                stage: context.stage(),
                message: context.to_string(),
            },
        }
    }
}
