//! Cycle-level models of clocked memory primitives: a synchronous FIFO
//! built on a circular buffer, a single-port RAM, and a ROM.

#![warn(missing_docs)]

pub mod bench;
pub mod clock;
pub mod error;
pub mod fifo;
pub mod parse;
pub mod store;
pub mod word;
