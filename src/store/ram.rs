use super::{MemConfig, SimStore};
use crate::clock::{Clocked, Reg};
use crate::word::{Word, WordWidth};

//===========================================================================//

/// The input signals of a [`Ram`] for one clock cycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RamInput {
    /// The address to read or write.
    pub addr: u32,
    /// The data to write (ignored on read cycles).
    pub data_in: Word,
    /// True for a write cycle, false for a read cycle.
    pub write_enable: bool,
}

//===========================================================================//

/// A simulated single-port RAM with a registered read output.
///
/// Each clock cycle performs exactly one operation: if write-enable is
/// asserted, the addressed cell is written and the output register keeps its
/// old value; otherwise, the addressed cell is latched into the output
/// register.  Addresses beyond the capacity are mirrored.
pub struct Ram {
    config: MemConfig,
    cells: Box<[Word]>,
    data_out: Reg<Word>,
    input: Option<RamInput>,
}

impl Ram {
    /// Returns a new simulated RAM with all cells zeroed.
    pub fn new(config: MemConfig) -> Ram {
        Ram {
            config,
            cells: vec![0; config.capacity()].into_boxed_slice(),
            data_out: Reg::new(0),
            input: None,
        }
    }

    /// Drives the input signals for the current cycle.  They take effect at
    /// the next call to [`Clocked::update`].
    pub fn drive(&mut self, input: RamInput) {
        self.input = Some(input);
    }

    /// Simulates one full clock cycle with the given inputs, and returns the
    /// registered output afterwards.
    pub fn access(
        &mut self,
        addr: u32,
        data_in: Word,
        write_enable: bool,
    ) -> Word {
        self.drive(RamInput { addr, data_in, write_enable });
        self.update();
        self.data_out()
    }

    /// Returns the current value of the registered read output.
    pub fn data_out(&self) -> Word {
        self.data_out.sample()
    }
}

impl Clocked for Ram {
    fn update(&mut self) {
        if let Some(input) = self.input.take() {
            let index = self.config.index(input.addr);
            if input.write_enable {
                let value = self.config.width().truncate(input.data_in);
                log::trace!("RAM write [{index:#x}] <= {value:#x}");
                self.cells[index] = value;
            } else {
                self.data_out.drive(self.cells[index]);
            }
        }
        self.data_out.update();
    }
}

impl SimStore for Ram {
    fn description(&self) -> String {
        self.config.describe("RAM")
    }

    fn capacity(&self) -> usize {
        self.config.capacity()
    }

    fn width(&self) -> WordWidth {
        self.config.width()
    }

    fn peek(&self, addr: u32) -> Word {
        self.cells[self.config.index(addr)]
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Ram, RamInput};
    use crate::clock::Clocked;
    use crate::store::{MemConfig, SimStore};

    fn make_ram(capacity: usize, bits: u32) -> Ram {
        Ram::new(MemConfig::new(capacity, bits).unwrap())
    }

    #[test]
    fn description() {
        assert_eq!(make_ram(16, 8).description(), "16 x 8-bit RAM");
        assert_eq!(make_ram(4096, 32).description(), "4096 x 32-bit RAM");
    }

    #[test]
    fn read_is_registered() {
        let mut ram = make_ram(16, 8);
        ram.access(3, 0x5a, true);
        assert_eq!(ram.data_out(), 0x00);
        ram.drive(RamInput { addr: 3, data_in: 0, write_enable: false });
        assert_eq!(ram.data_out(), 0x00);
        ram.update();
        assert_eq!(ram.data_out(), 0x5a);
    }

    #[test]
    fn write_cycle_holds_output() {
        let mut ram = make_ram(16, 8);
        ram.access(1, 0x11, true);
        assert_eq!(ram.access(1, 0, false), 0x11);
        assert_eq!(ram.access(2, 0x22, true), 0x11);
        assert_eq!(ram.peek(2), 0x22);
        assert_eq!(ram.access(2, 0, false), 0x22);
    }

    #[test]
    fn undriven_cycle_is_idle() {
        let mut ram = make_ram(16, 8);
        ram.access(0, 0x77, true);
        ram.access(0, 0, false);
        ram.update();
        assert_eq!(ram.data_out(), 0x77);
        assert_eq!(ram.peek(0), 0x77);
    }

    #[test]
    fn write_data_is_truncated() {
        let mut ram = make_ram(16, 4);
        ram.access(0, 0xab, true);
        assert_eq!(ram.peek(0), 0xb);
    }

    #[test]
    fn address_mirroring() {
        let mut ram = make_ram(0x100, 8);
        assert_eq!(ram.access(0x0012, 0, false), 0x00);
        ram.access(0x1012, 0xab, true);
        assert_eq!(ram.access(0x0012, 0, false), 0xab);
        assert_eq!(ram.access(0x0112, 0, false), 0xab);
        assert_eq!(ram.peek(0xff12), 0xab);
    }
}

//===========================================================================//
