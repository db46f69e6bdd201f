use crate::word::Word;

//===========================================================================//

/// An error encountered while configuring a simulated memory primitive.
///
/// These are only ever returned at construction time.  Once a component has
/// been built, none of its per-cycle operations can fail.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The requested capacity was zero.
    #[error("capacity must be nonzero")]
    ZeroCapacity,
    /// The requested capacity cannot be addressed with 32-bit addresses.
    #[error("capacity of {capacity} words exceeds the 32-bit address space")]
    CapacityTooLarge {
        /// The requested capacity.
        capacity: usize,
    },
    /// The requested word width was zero.
    #[error("word width must be nonzero")]
    ZeroWidth,
    /// The requested word width is wider than a [`Word`] can hold.
    #[error("word width of {bits} bits exceeds the maximum of 64 bits")]
    WidthTooLarge {
        /// The requested width, in bits.
        bits: u32,
    },
    /// The initial contents for a read-only store have more words than the
    /// store's capacity.
    #[error("initial data has {len} words, but capacity is only {capacity}")]
    InitDataTooLong {
        /// The number of words of initial data.
        len: usize,
        /// The capacity of the store.
        capacity: usize,
    },
    /// A word of initial data does not fit in the store's word width.
    #[error(
        "initial value {value:#x} at address {address:#x} does not fit in \
         {bits} bits"
    )]
    InitValueTooWide {
        /// The address of the offending word.
        address: usize,
        /// The offending value.
        value: Word,
        /// The store's word width, in bits.
        bits: u32,
    },
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::ConfigError;

    #[test]
    fn messages() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "capacity must be nonzero"
        );
        assert_eq!(
            ConfigError::WidthTooLarge { bits: 65 }.to_string(),
            "word width of 65 bits exceeds the maximum of 64 bits"
        );
        assert_eq!(
            ConfigError::InitValueTooWide { address: 3, value: 0x1ff, bits: 8 }
                .to_string(),
            "initial value 0x1ff at address 0x3 does not fit in 8 bits"
        );
    }
}

//===========================================================================//
