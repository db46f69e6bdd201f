//! Fixed-width data words.

use crate::error::ConfigError;
use std::fmt;

//===========================================================================//

/// The payload carried by a memory cell or a data signal.
///
/// Only the low [`WordWidth::bits`] bits of a word are meaningful; the rest
/// are always zero for any value stored in a simulated component.
pub type Word = u64;

//===========================================================================//

/// The width, in bits, of the words held by a memory primitive.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WordWidth(u32);

impl WordWidth {
    /// The widest word that can be represented.
    pub const MAX_BITS: u32 = Word::BITS;

    /// Returns a word width of the given number of bits, which must be
    /// between 1 and [`WordWidth::MAX_BITS`] inclusive.
    pub fn new(bits: u32) -> Result<WordWidth, ConfigError> {
        if bits == 0 {
            Err(ConfigError::ZeroWidth)
        } else if bits > WordWidth::MAX_BITS {
            Err(ConfigError::WidthTooLarge { bits })
        } else {
            Ok(WordWidth(bits))
        }
    }

    /// Returns the number of bits in a word.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns a mask with the low [`bits`](WordWidth::bits) bits set.  This
    /// is also the largest value a word of this width can hold.
    pub fn mask(self) -> Word {
        Word::MAX >> (WordWidth::MAX_BITS - self.0)
    }

    /// Discards any bits of `value` above this width.
    pub fn truncate(self, value: Word) -> Word {
        value & self.mask()
    }

    /// Returns true if `value` can be held in a word of this width without
    /// losing any bits.
    pub fn fits(self, value: Word) -> bool {
        value & !self.mask() == 0
    }

    /// Returns the number of bytes needed to store one word.
    pub fn bytes(self) -> usize {
        self.0.div_ceil(8) as usize
    }

    /// Returns the number of hex digits needed to print any word.
    pub fn hex_digits(self) -> usize {
        self.0.div_ceil(4) as usize
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}-bit", self.0)
    }
}

//===========================================================================//


//===========================================================================//
