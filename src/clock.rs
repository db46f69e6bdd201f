//! Facilities for simulating clocked (synchronous) logic.
//!
//! A clocked component is driven with its input signals for the current
//! cycle, and then updated once to simulate the clock edge.  Any registered
//! state it holds is split into a committed value (visible to everyone during
//! the cycle) and a pending value (driven during the cycle, and only visible
//! after the edge).

//===========================================================================//

/// Interface to a clocked component.
pub trait Clocked {
    /// Simulates a clock edge, committing any state driven since the last
    /// edge.
    fn update(&mut self);
}

//===========================================================================//

/// A simulated register.
#[derive(Clone, Copy, Debug)]
pub struct Reg<T: Copy> {
    /// The committed value of this register.
    data: T,
    /// The value to commit at the next clock edge, if any.
    next: Option<T>,
}

impl<T: Copy> Reg<T> {
    /// Returns a new register holding the given initial value.
    pub fn new(init: T) -> Reg<T> {
        Reg { data: init, next: None }
    }

    /// Drives input to this register.  The value becomes visible after the
    /// next clock edge; driving again before then replaces it.
    pub fn drive(&mut self, value: T) {
        self.next = Some(value);
    }

    /// Samples the committed value of this register.
    pub fn sample(&self) -> T {
        self.data
    }

    /// Returns the value driven since the last clock edge, if any.
    pub fn pending(&self) -> Option<T> {
        self.next
    }
}

impl<T: Copy + Default> Default for Reg<T> {
    fn default() -> Reg<T> {
        Reg::new(T::default())
    }
}

impl<T: Copy> Clocked for Reg<T> {
    fn update(&mut self) {
        if let Some(next) = self.next.take() {
            self.data = next;
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Clocked, Reg};

    #[test]
    fn reg_increment() {
        let mut reg = Reg::new(0u32);
        for i in 0..8 {
            let x = reg.sample();
            reg.drive(x + 1);
            assert_eq!(x, i);
            assert_eq!(reg.sample(), i);
            assert_eq!(reg.pending(), Some(i + 1));
            reg.update();
        }
        assert_eq!(reg.sample(), 8);
        assert_eq!(reg.pending(), None);
    }

    #[test]
    fn undriven_reg_holds_value() {
        let mut reg = Reg::new(0xabu8);
        reg.update();
        reg.update();
        assert_eq!(reg.sample(), 0xab);
    }

    #[test]
    fn last_drive_wins() {
        let mut reg = Reg::<bool>::default();
        reg.drive(true);
        reg.drive(false);
        reg.update();
        assert!(!reg.sample());
    }
}

//===========================================================================//
