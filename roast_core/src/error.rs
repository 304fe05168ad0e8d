use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RoastError {
    #[error("probe error: {0}")]
    Probe(String),
    #[error("probe fault: {0}")]
    ProbeFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timeout waiting for probe")]
    Timeout,
    #[error("probe has no more readings")]
    Exhausted,
    #[error("invalid state: {0}")]
    State(String),
    #[error("invalid profile: {0}")]
    Profile(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("no channels configured")]
    MissingChannels,
    #[error("primary channel '{0}' is not among the configured channels")]
    UnknownPrimary(String),
    #[error("duplicate channel id '{0}'")]
    DuplicateChannel(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
