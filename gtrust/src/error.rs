//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] gtrust_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] gtrust_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] gtrust_types::Error),
}
