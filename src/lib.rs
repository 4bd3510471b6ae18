pub mod bio;
pub mod cli;
pub mod core;
pub mod tools;
pub mod utils;

pub use crate::core::{
    ingestion::IngestionOrchestrator,
    search::{AlignmentSearch, BestAlignmentMap},
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeqAtomsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("External tool error: {0}")]
    Tool(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SeqAtomsError {
    fn from(err: serde_json::Error) -> Self {
        SeqAtomsError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for SeqAtomsError {
    fn from(err: csv::Error) -> Self {
        SeqAtomsError::Parse(format!("hit table: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SeqAtomsError>;
