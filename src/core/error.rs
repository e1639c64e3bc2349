//! Application-wide error types.

use thiserror::Error;

use crate::sheets::SheetsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("sheets error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
