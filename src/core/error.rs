//! Error types for the volatility dashboard

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("No data returned: {0}")]
    EmptyData(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Degenerate input: {0}")]
    Degenerate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type DashResult<T> = Result<T, DashError>;

impl DashError {
    pub fn empty_data(msg: impl Into<String>) -> Self {
        Self::EmptyData(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::Degenerate(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Is this the "ticker unknown / nothing returned" condition?
    pub fn is_empty_data(&self) -> bool {
        matches!(self, Self::EmptyData(_))
    }
}
