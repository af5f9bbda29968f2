/// Errors raised while building positions or starting a search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("could not parse '{0}' as a valid move")]
    InvalidMove(String),

    #[error("Invalid move, column {0} full")]
    ColumnFull(usize),

    #[error("invalid search parameter: {0}")]
    InvalidSearchParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
