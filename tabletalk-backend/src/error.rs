use thiserror::Error;

/// Assistant-wide error taxonomy. Only `Config` is fatal, and only at
/// startup; every other variant is caught at the turn boundary and
/// converted into a user-visible reply.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("model transport error: {0}")]
    ModelTransport(String),

    #[error("malformed model output: {0}")]
    ModelFormat(String),

    #[error("operation not permitted: {0}")]
    PolicyRejection(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
