//! Facilities for simulating addressable storage arrays (RAM and ROM).

use crate::error::ConfigError;
use crate::word::{Word, WordWidth};

mod image;
mod ram;
mod rom;

pub use image::{
    Endian, MAX_HEX_IMAGE_WORDS, load_binary_image, load_hex_image,
};
pub use ram::{Ram, RamInput};
pub use rom::Rom;

//===========================================================================//

/// The shape of a simulated memory array: how many words it holds, and how
/// wide each word is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemConfig {
    capacity: usize,
    width: WordWidth,
}

impl MemConfig {
    /// The largest capacity that can be addressed with a 32-bit address.
    pub const MAX_CAPACITY: u64 = 1 << 32;

    /// Returns a configuration for `capacity` words of `bits` bits each.
    pub fn new(capacity: usize, bits: u32) -> Result<MemConfig, ConfigError> {
        let width = WordWidth::new(bits)?;
        MemConfig::with_width(capacity, width)
    }

    /// Returns a configuration for `capacity` words of the given width.
    pub fn with_width(
        capacity: usize,
        width: WordWidth,
    ) -> Result<MemConfig, ConfigError> {
        if capacity == 0 {
            Err(ConfigError::ZeroCapacity)
        } else if capacity as u64 > MemConfig::MAX_CAPACITY {
            Err(ConfigError::CapacityTooLarge { capacity })
        } else {
            Ok(MemConfig { capacity, width })
        }
    }

    /// Returns the number of words.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the width of each word.
    pub fn width(&self) -> WordWidth {
        self.width
    }

    /// Maps an address onto a cell index.  Addresses beyond the capacity wrap
    /// around, as though the upper address lines weren't connected.
    pub(crate) fn index(&self, addr: u32) -> usize {
        (addr as usize) % self.capacity
    }

    pub(crate) fn describe(&self, kind: &str) -> String {
        format!("{} x {} {}", self.capacity, self.width, kind)
    }
}

//===========================================================================//

/// A read-only view of a simulated storage array.
///
/// Implementations should *not* panic when given an address that is out of
/// range; instead, the address wraps modulo the capacity.
pub trait SimStore {
    /// Returns a human-readable description of this store.
    fn description(&self) -> String;

    /// Returns the number of words in this store.
    fn capacity(&self) -> usize;

    /// Returns the width of each word in this store.
    fn width(&self) -> WordWidth;

    /// Returns the word at the given address without simulating a clock
    /// cycle or touching any output registers.
    fn peek(&self, addr: u32) -> Word;
}

//===========================================================================//

/// Which configuration to build with [`configure`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreKind {
    /// A zero-initialized store that can be written.
    Writable,
    /// A store initialized once from the given words, and never written.
    ReadOnly(Vec<Word>),
}

/// A storage array in one of its two configurations.
///
/// Only the [`Store::Ram`] configuration has any write capability, and it is
/// reachable only through [`Store::as_ram_mut`].
pub enum Store {
    /// A writable store.
    Ram(Ram),
    /// A read-only store.
    Rom(Rom),
}

impl Store {
    /// Returns the writable store, if this is one.
    pub fn as_ram_mut(&mut self) -> Option<&mut Ram> {
        match self {
            Store::Ram(ram) => Some(ram),
            Store::Rom(_) => None,
        }
    }

    /// Returns the read-only store, if this is one.
    pub fn as_rom(&self) -> Option<&Rom> {
        match self {
            Store::Ram(_) => None,
            Store::Rom(rom) => Some(rom),
        }
    }

    fn inner(&self) -> &dyn SimStore {
        match self {
            Store::Ram(ram) => ram,
            Store::Rom(rom) => rom,
        }
    }
}

impl SimStore for Store {
    fn description(&self) -> String {
        self.inner().description()
    }

    fn capacity(&self) -> usize {
        self.inner().capacity()
    }

    fn width(&self) -> WordWidth {
        self.inner().width()
    }

    fn peek(&self, addr: u32) -> Word {
        self.inner().peek(addr)
    }
}

/// Builds a storage array of `capacity` words, each `bits` bits wide.
pub fn configure(
    capacity: usize,
    bits: u32,
    kind: StoreKind,
) -> Result<Store, ConfigError> {
    let config = MemConfig::new(capacity, bits)?;
    match kind {
        StoreKind::Writable => Ok(Store::Ram(Ram::new(config))),
        StoreKind::ReadOnly(init) => Ok(Store::Rom(Rom::new(config, &init)?)),
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{MemConfig, SimStore, StoreKind, configure};
    use crate::error::ConfigError;

    #[test]
    fn invalid_configs() {
        assert_eq!(MemConfig::new(0, 8), Err(ConfigError::ZeroCapacity));
        assert_eq!(MemConfig::new(16, 0), Err(ConfigError::ZeroWidth));
        assert_eq!(
            MemConfig::new(16, 72),
            Err(ConfigError::WidthTooLarge { bits: 72 })
        );
    }

    #[test]
    fn address_wraps() {
        let config = MemConfig::new(10, 8).unwrap();
        assert_eq!(config.index(3), 3);
        assert_eq!(config.index(13), 3);
        assert_eq!(config.index(u32::MAX), (u32::MAX as usize) % 10);
    }

    #[test]
    fn configure_writable() {
        let mut store = configure(16, 8, StoreKind::Writable).unwrap();
        assert_eq!(store.description(), "16 x 8-bit RAM");
        assert!(store.as_rom().is_none());
        let ram = store.as_ram_mut().unwrap();
        ram.access(5, 0x42, true);
        assert_eq!(store.peek(5), 0x42);
    }

    #[test]
    fn configure_read_only() {
        let mut store =
            configure(4, 8, StoreKind::ReadOnly(vec![1, 2, 3])).unwrap();
        assert_eq!(store.description(), "4 x 8-bit ROM");
        assert!(store.as_ram_mut().is_none());
        assert_eq!(store.peek(2), 3);
        assert_eq!(store.peek(3), 0);
        assert_eq!(store.as_rom().unwrap().read(6), 3);
    }

    #[test]
    fn configure_rejects_bad_init() {
        assert_eq!(
            configure(2, 8, StoreKind::ReadOnly(vec![1, 2, 3])).err(),
            Some(ConfigError::InitDataTooLong { len: 3, capacity: 2 })
        );
        assert_eq!(
            configure(0, 8, StoreKind::Writable).err(),
            Some(ConfigError::ZeroCapacity)
        );
    }
}

//===========================================================================//
