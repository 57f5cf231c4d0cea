use thiserror::Error;

/// Faults raised while evaluating an event. The gate never propagates these;
/// they are logged and the event is forwarded.
#[derive(Debug, Error)]
pub enum FloodError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("clock unavailable: {0}")]
    Clock(String),
    #[error("message history lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("failed to read config file: {0}")]
    Read(#[from] dotenvy::Error),
}
