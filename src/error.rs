use std::collections::TryReserveError;

/// Represents errors that can occur when building or filling a table
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The bucket power is outside of `1..=63`
    InvalidBucketPower(u8),

    /// Backing storage could not be reserved
    AllocationFailure(TryReserveError),

    /// Every slot on the key's probe sequence holds a different live key
    ///
    /// Only returned by the open-addressing table.
    TableFull,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBucketPower(s) => write!(
                f,
                "bucket power {s} is outside of {}..={}",
                crate::MIN_BUCKET_POWER,
                crate::MAX_BUCKET_POWER
            ),
            Self::AllocationFailure(e) => write!(f, "allocation failure: {e}"),
            Self::TableFull => write!(f, "table is full"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AllocationFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Self::AllocationFailure(value)
    }
}

/// Table result
pub type Result<T> = std::result::Result<T, Error>;
