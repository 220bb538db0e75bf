use thiserror::Error;

use crate::shiftand::MAX_NEEDLE_LEN;

/// Errors returned while compiling a search pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("search pattern length must be between 1 and {max}, got {len}", max = MAX_NEEDLE_LEN)]
    InvalidPattern { len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
