use std::io;

use config::ConfigError;
use control_tower::LayoutError;
use thiserror::Error;
use tokio::task::JoinError;

pub(crate) type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub(crate) enum ApplicationError {
    #[error("Error regarding config: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("No configuration directory available for this user")]
    NoConfigDirectory,
    #[error("Invalid gate layout: {0}")]
    LayoutError(#[from] LayoutError),
    #[error("System input/output error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to parse landing request: {0}")]
    RequestParseError(#[from] nom::error::Error<String>),
    #[error("Failed to render report: {0}")]
    ReportError(#[from] askama::Error),
    #[error("Logging setup error: {0}")]
    LogFilterError(#[from] tracing_subscriber::filter::ParseError),
    #[error("Join error: {0}")]
    AsyncJoinError(#[from] JoinError),
}
