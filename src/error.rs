/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by pool and executor construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Worker thread could not be spawned.
    #[error("executor error: {0}")]
    Executor(String),

    /// Configuration contract violation.
    #[error("config error: {0}")]
    Config(String),

    /// The global pool was already built; its executor is fixed.
    #[error("global pool already initialized")]
    AlreadyInitialized,

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Executor error from a message.
    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    /// Config error from a message.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}
