use super::{MemConfig, SimStore};
use crate::error::ConfigError;
use crate::word::{Word, WordWidth};

//===========================================================================//

/// A simulated read-only memory.  Reads are combinational, and reads beyond
/// the ROM size will be mirrored.  There is no way to write to a ROM once it
/// has been built.
pub struct Rom {
    config: MemConfig,
    cells: Box<[Word]>,
}

impl Rom {
    /// Returns a new simulated ROM holding the given initial data.  If there
    /// are fewer words of data than the ROM's capacity, the remaining cells
    /// are zeroed.  Returns an error if there is too much data, or if any word
    /// doesn't fit in the ROM's word width.
    pub fn new(config: MemConfig, init: &[Word]) -> Result<Rom, ConfigError> {
        let capacity = config.capacity();
        if init.len() > capacity {
            return Err(ConfigError::InitDataTooLong {
                len: init.len(),
                capacity,
            });
        }
        let width = config.width();
        if let Some((address, &value)) =
            init.iter().enumerate().find(|&(_, &value)| !width.fits(value))
        {
            return Err(ConfigError::InitValueTooWide {
                address,
                value,
                bits: width.bits(),
            });
        }
        let mut cells = vec![0; capacity].into_boxed_slice();
        cells[..init.len()].copy_from_slice(init);
        Ok(Rom { config, cells })
    }

    /// Returns the word at the given address.  The output depends only on the
    /// address, with no clock involved.
    pub fn read(&self, addr: u32) -> Word {
        self.cells[self.config.index(addr)]
    }

    /// Returns the entire contents of the ROM.
    pub fn contents(&self) -> &[Word] {
        &self.cells
    }
}

impl SimStore for Rom {
    fn description(&self) -> String {
        self.config.describe("ROM")
    }

    fn capacity(&self) -> usize {
        self.config.capacity()
    }

    fn width(&self) -> WordWidth {
        self.config.width()
    }

    fn peek(&self, addr: u32) -> Word {
        self.read(addr)
    }
}

//===========================================================================//


//===========================================================================//
