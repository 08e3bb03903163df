use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverseerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Background map worker panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, OverseerError>;
