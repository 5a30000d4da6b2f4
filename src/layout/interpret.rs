//! Offset interpreters for link fields.
//!
//! An [`Interpreter`] turns a link field's raw bytes into an absolute byte
//! offset in the image. [`BlockAddress`] covers both canonical shapes:
//! a direct integer offset (block size 1, no base) and a scaled block number
//! (`block * block_size + base_offset`). Closures returning `Option<u64>` work
//! as interpreters as well.

use std::fmt;

use crate::layout::format::Endian;

/// Maps raw field bytes to an absolute byte offset.
///
/// `None` means the value cannot be represented as an offset (wider than 64
/// bits, or scaling overflowed). Callers report it as out of range.
pub trait Interpreter: Send + Sync {
    fn offset(&self, raw: &[u8]) -> Option<u64>;
}

impl<F> Interpreter for F
where
    F: Fn(&[u8]) -> Option<u64> + Send + Sync,
{
    fn offset(&self, raw: &[u8]) -> Option<u64> {
        self(raw)
    }
}

/// Integer decode followed by `value * block_size + base_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAddress {
    pub endian: Endian,
    pub block_size: u64,
    pub base_offset: u64,
}

impl BlockAddress {
    /// The raw integer is itself the absolute byte offset.
    pub const fn absolute(endian: Endian) -> Self {
        BlockAddress {
            endian,
            block_size: 1,
            base_offset: 0,
        }
    }

    /// The raw integer is a block number of `block_size` bytes, counted from
    /// `base_offset`.
    pub const fn scaled(endian: Endian, block_size: u64, base_offset: u64) -> Self {
        BlockAddress {
            endian,
            block_size,
            base_offset,
        }
    }
}

impl Interpreter for BlockAddress {
    fn offset(&self, raw: &[u8]) -> Option<u64> {
        let value = u64::try_from(self.endian.decode(raw)?).ok()?;
        value
            .checked_mul(self.block_size)?
            .checked_add(self.base_offset)
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.block_size == 1 && self.base_offset == 0 {
            write!(f, "{} offset", self.endian)
        } else {
            write!(
                f,
                "{} block * {} + {}",
                self.endian, self.block_size, self.base_offset
            )
        }
    }
}
