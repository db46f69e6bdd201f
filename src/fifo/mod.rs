//! Facilities for simulating a clocked circular buffer (FIFO).

use crate::clock::{Clocked, Reg};
use crate::error::ConfigError;
use crate::store::MemConfig;
use crate::word::{Word, WordWidth};

mod shared;

pub use shared::SharedBuffer;

//===========================================================================//

/// The input signals of a [`CircularBuffer`] for one clock cycle.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct FifoInput {
    /// Synchronous reset; overrides every other input for the cycle.
    pub reset: bool,
    /// Requests that `data_in` be pushed onto the back of the buffer.
    pub write_request: bool,
    /// Requests that the front of the buffer be popped into `data_out`.
    pub read_request: bool,
    /// The data to push, if a write is accepted.
    pub data_in: Word,
}

impl FifoInput {
    /// A cycle with no requests.
    pub fn idle() -> FifoInput {
        FifoInput::default()
    }

    /// A cycle with reset asserted.
    pub fn reset() -> FifoInput {
        FifoInput { reset: true, ..FifoInput::default() }
    }

    /// A cycle requesting a write of `data`.
    pub fn write(data: Word) -> FifoInput {
        FifoInput {
            write_request: true,
            data_in: data,
            ..FifoInput::default()
        }
    }

    /// A cycle requesting a read.
    pub fn read() -> FifoInput {
        FifoInput { read_request: true, ..FifoInput::default() }
    }

    /// A cycle requesting both a write of `data` and a read.
    pub fn write_read(data: Word) -> FifoInput {
        FifoInput {
            write_request: true,
            read_request: true,
            data_in: data,
            ..FifoInput::default()
        }
    }
}

//===========================================================================//

/// The registered output signals of a [`CircularBuffer`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct FifoOutput {
    /// The word most recently popped by an accepted read.
    pub data_out: Word,
    /// True iff the buffer holds as many words as its capacity.
    pub full: bool,
    /// True iff the buffer holds no words.
    pub empty: bool,
    /// The number of words held.
    pub occupancy: usize,
}

//===========================================================================//

/// A simulated synchronous FIFO built around a ring of word slots.
///
/// All state that is visible from outside (the two pointers, the occupancy
/// count, `data_out`, and the full/empty flags) is registered.  During a
/// cycle, the next values are computed only from the committed values of the
/// previous cycle; in particular, whether a request is accepted depends on
/// the full/empty flags as they stood at the end of the previous cycle.
pub struct CircularBuffer {
    config: MemConfig,
    slots: Box<[Word]>,
    write_index: Reg<usize>,
    read_index: Reg<usize>,
    occupancy: Reg<usize>,
    data_out: Reg<Word>,
    full: Reg<bool>,
    empty: Reg<bool>,
    input: Option<FifoInput>,
    cycle: u64,
}

impl CircularBuffer {
    /// Returns a new, empty buffer with the given capacity and word width.
    pub fn new(config: MemConfig) -> CircularBuffer {
        CircularBuffer {
            config,
            slots: vec![0; config.capacity()].into_boxed_slice(),
            write_index: Reg::new(0),
            read_index: Reg::new(0),
            occupancy: Reg::new(0),
            data_out: Reg::new(0),
            full: Reg::new(false),
            empty: Reg::new(true),
            input: None,
            cycle: 0,
        }
    }

    /// Returns a new, empty buffer of `capacity` words, each `bits` bits
    /// wide.
    pub fn with_capacity(
        capacity: usize,
        bits: u32,
    ) -> Result<CircularBuffer, ConfigError> {
        Ok(CircularBuffer::new(MemConfig::new(capacity, bits)?))
    }

    /// Drives the input signals for the current cycle.  They take effect at
    /// the next call to [`Clocked::update`]; an undriven clock edge behaves
    /// like [`FifoInput::idle`].
    pub fn drive(&mut self, input: FifoInput) {
        self.input = Some(input);
    }

    /// Simulates one full clock cycle with the given inputs, and returns the
    /// registered outputs afterwards.
    pub fn step(&mut self, input: FifoInput) -> FifoOutput {
        self.drive(input);
        self.update();
        self.output()
    }

    /// Returns the current registered outputs.
    pub fn output(&self) -> FifoOutput {
        FifoOutput {
            data_out: self.data_out.sample(),
            full: self.full.sample(),
            empty: self.empty.sample(),
            occupancy: self.occupancy.sample(),
        }
    }

    /// Returns the maximum number of words the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Returns the width of each word.
    pub fn width(&self) -> WordWidth {
        self.config.width()
    }

    /// Returns the index of the slot that the next accepted write will fill.
    pub fn write_index(&self) -> usize {
        self.write_index.sample()
    }

    /// Returns the index of the slot that the next accepted read will pop.
    pub fn read_index(&self) -> usize {
        self.read_index.sample()
    }

    /// Returns the number of words held.
    pub fn occupancy(&self) -> usize {
        self.occupancy.sample()
    }

    /// Returns the registered full flag.
    pub fn is_full(&self) -> bool {
        self.full.sample()
    }

    /// Returns the registered empty flag.
    pub fn is_empty(&self) -> bool {
        self.empty.sample()
    }

    /// Returns the word most recently popped by an accepted read.
    pub fn data_out(&self) -> Word {
        self.data_out.sample()
    }

    /// Returns the raw contents of the given slot, whether or not it
    /// currently holds a valid entry.
    pub fn slot(&self, index: usize) -> Option<Word> {
        self.slots.get(index).copied()
    }

    /// Returns the raw contents of all slots.
    pub fn slots(&self) -> &[Word] {
        &self.slots
    }

    /// Returns the valid entries, front first.
    pub fn contents(&self) -> impl Iterator<Item = Word> + '_ {
        let start = self.read_index();
        (0..self.occupancy())
            .map(move |offset| self.slots[(start + offset) % self.capacity()])
    }

    /// Returns the number of clock edges simulated so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }

    fn drive_reset(&mut self) {
        log::debug!("cycle {}: reset", self.cycle);
        self.write_index.drive(0);
        self.read_index.drive(0);
        self.occupancy.drive(0);
        self.data_out.drive(0);
        self.full.drive(false);
        self.empty.drive(true);
    }

    /// Computes the next state from the committed state and the given
    /// inputs.  Returns the slot write to perform at the clock edge, if any.
    fn drive_next(&mut self, input: FifoInput) -> Option<(usize, Word)> {
        let accept_write = input.write_request && !self.full.sample();
        let accept_read = input.read_request && !self.empty.sample();
        if input.write_request && !accept_write {
            log::debug!("cycle {}: write dropped (full)", self.cycle);
        }
        if input.read_request && !accept_read {
            log::debug!("cycle {}: read dropped (empty)", self.cycle);
        }

        let mut slot_write = None;
        if accept_write {
            let index = self.write_index.sample();
            slot_write = Some((index, self.width().truncate(input.data_in)));
            self.write_index.drive(self.advance(index));
        }
        if accept_read {
            let index = self.read_index.sample();
            self.data_out.drive(self.slots[index]);
            self.read_index.drive(self.advance(index));
        }

        let occupancy = self.occupancy.sample();
        let occupancy = match (accept_write, accept_read) {
            (true, false) => occupancy + 1,
            (false, true) => occupancy - 1,
            (true, true) | (false, false) => occupancy,
        };
        debug_assert!(occupancy <= self.capacity());
        self.occupancy.drive(occupancy);
        self.full.drive(occupancy == self.capacity());
        self.empty.drive(occupancy == 0);
        slot_write
    }
}

impl Clocked for CircularBuffer {
    fn update(&mut self) {
        let input = self.input.take().unwrap_or_default();
        let slot_write = if input.reset {
            self.drive_reset();
            None
        } else {
            self.drive_next(input)
        };
        if let Some((index, data)) = slot_write {
            self.slots[index] = data;
        }
        self.write_index.update();
        self.read_index.update();
        self.occupancy.update();
        self.data_out.update();
        self.full.update();
        self.empty.update();
        log::trace!("cycle {}: {:?} -> {:?}", self.cycle, input, self.output());
        self.cycle += 1;
    }
}

//===========================================================================//


//===========================================================================//
