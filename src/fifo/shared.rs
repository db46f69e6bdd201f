use super::{CircularBuffer, FifoInput, FifoOutput};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//===========================================================================//

/// A cloneable handle to a [`CircularBuffer`] that can be stepped from
/// multiple threads.
///
/// Every clock cycle runs to completion while holding a single lock, so
/// cycles from different threads are serialized and never interleave.  The
/// buffer provides no arbitration beyond that: each thread's request is a
/// separate cycle, and producers/consumers must coordinate through the
/// full/empty flags.
#[derive(Clone)]
pub struct SharedBuffer {
    inner: Arc<Mutex<CircularBuffer>>,
}

impl SharedBuffer {
    /// Wraps the given buffer in a shared handle.
    pub fn new(buffer: CircularBuffer) -> SharedBuffer {
        SharedBuffer { inner: Arc::new(Mutex::new(buffer)) }
    }

    /// Simulates one full clock cycle with the given inputs, and returns the
    /// registered outputs afterwards.
    pub fn step(&self, input: FifoInput) -> FifoOutput {
        self.lock().step(input)
    }

    /// Returns the current registered outputs.
    pub fn output(&self) -> FifoOutput {
        self.lock().output()
    }

    /// Runs `func` with exclusive access to the underlying buffer.
    pub fn with<R>(&self, func: impl FnOnce(&mut CircularBuffer) -> R) -> R {
        func(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, CircularBuffer> {
        // Cycles commit whole, so a poisoned buffer is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//===========================================================================//


//===========================================================================//
