use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid cube state: {0}")]
    InvalidState(String),
    #[error("Invalid move: {0}")]
    NoLegalMove(String),
    #[error("Invalid facelet string")]
    InvalidFaceletString,
    #[error("Invalid facelet value")]
    InvalidFaceletValue,
    #[error("No last layer pattern matches the cube")]
    PatternNotFound,
    #[error("Heuristic table does not match the solver config: {0}")]
    TableMismatch(String),
    #[error("Precomputation failed: {0}")]
    Precompute(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] bincode::error::EncodeError),
    #[error(transparent)]
    Decode(#[from] bincode::error::DecodeError),
}
