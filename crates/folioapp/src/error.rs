use crate::model::Kind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("New {kind} missing `parentId`")]
    MissingParent { kind: Kind },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Cannot read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sort key space exhausted between {lower} and {upper}, rebalance the siblings")]
    SortKeyExhausted { lower: f64, upper: f64 },

    #[error("Sibling parent mismatch: expected {expected:?}, found {found:?}")]
    ParentMismatch {
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("Invalid sort key: {0}")]
    InvalidSortKey(f64),

    #[error("{kind} not found: {id}")]
    DocumentNotFound { kind: Kind, id: String },

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
