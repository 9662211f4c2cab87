use std::path::PathBuf;

use thiserror::Error;

use crate::session::typing::SessionState;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("session is {state:?} and accepts no more input")]
    Closed { state: SessionState },
    #[error("cannot start a session over an empty target stream")]
    EmptyStream,
    #[error("no session is running")]
    NoActiveSession,
    #[error("session has not completed yet")]
    NotFinished,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_misses must be at least 1")]
    ZeroMaxMisses,
    #[error("speed increment must be positive, got {0}")]
    NonPositiveIncrement(f64),
    #[error("speed ceiling {ceiling} must be above the start speed {start}")]
    CeilingNotAboveStart { start: f64, ceiling: f64 },
    #[error("start speed must be positive, got {0}")]
    NonPositiveStartSpeed(f64),
    #[error("fall rate must be positive, got {0}")]
    NonPositiveFallRate(f64),
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("new symbol fraction must lie in [0, 1], got {0}")]
    FractionOutOfRange(f64),
    #[error("baseline distance must be positive, got {0}")]
    NonPositiveBaseline(f64),
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("bundled curriculum {0:?} not found")]
    MissingCurriculum(String),
    #[error("curriculum is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("failed to read curriculum: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid curriculum: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("a global logger is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}
