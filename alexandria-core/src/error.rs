use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlexandriaError {
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

impl AlexandriaError {
    /// Store and config failures abort the run; every other kind is absorbed
    /// at a source or item boundary and reported in the run result.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AlexandriaError::Store(_) | AlexandriaError::Config(_)
        )
    }
}
