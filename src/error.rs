//! Error types for expctr

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpctrError {
    #[error("task '{0}' already registered")]
    DuplicateTask(String),

    #[error("group '{0}' already registered")]
    DuplicateGroup(String),

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("task '{0}' not part of the running experiment")]
    TaskNotFound(String),

    #[error("an experiment is already running")]
    AlreadyRunning,

    #[error("no experiment running")]
    NoActiveSession,

    #[error("could not launch container: {0}")]
    Launch(String),

    #[error("container command failed: {0}")]
    Runtime(String),

    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExpctrError>;
