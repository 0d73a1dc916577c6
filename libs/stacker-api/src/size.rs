use std::fmt;
use std::num::NonZeroUsize;

use crate::error::BlockError;

/// Maximum number of records per block. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockSize(NonZeroUsize);

impl BlockSize {
    pub fn new(size: usize) -> Result<Self, BlockError> {
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or(BlockError::InvalidBlockSize(0))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Config formats only carry signed integers, so negative sizes arrive here.
impl TryFrom<i64> for BlockSize {
    type Error = BlockError;

    fn try_from(size: i64) -> Result<Self, Self::Error> {
        usize::try_from(size)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(BlockError::InvalidBlockSize(size))
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_sizes() {
        assert_eq!(BlockSize::new(3).unwrap().get(), 3);
        assert_eq!(BlockSize::try_from(7i64).unwrap().get(), 7);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(matches!(
            BlockSize::new(0),
            Err(BlockError::InvalidBlockSize(0))
        ));
        assert!(matches!(
            BlockSize::try_from(-4i64),
            Err(BlockError::InvalidBlockSize(-4))
        ));
        assert!(matches!(
            BlockSize::try_from(0i64),
            Err(BlockError::InvalidBlockSize(0))
        ));
    }
}
