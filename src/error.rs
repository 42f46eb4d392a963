use thiserror::Error;

use crate::tree::path::Path;

#[derive(Debug, Error)]
pub enum Error {
    /// FEN text failed structural validation.
    #[error("malformed position encoding: {0}")]
    MalformedPositionEncoding(String),

    /// A path addressed a node that is not in the tree (anymore).
    #[error("no node at path {0}")]
    PathNotFound(Path),

    #[error("illegal move {uci} in position {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("not a UCI move: {0:?}")]
    InvalidUci(String),

    #[error("session snapshot: {0}")]
    Session(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedPositionEncoding(msg.into())
}
