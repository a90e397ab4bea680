//! Busy Gate: a non-blocking, try-lock-only exclusion flag.
//!
//! One gate marks "a transfer is in flight" on an engine; the TWI layer uses
//! a second, independent gate as its Transaction Lock. There is no blocking
//! `acquire`: callers that cannot get the gate get an error.

use core::sync::atomic::{AtomicBool, Ordering};

/// Atomic exclusion flag with compare-and-swap acquire.
#[derive(Debug, Default)]
pub struct BusyGate {
    locked: AtomicBool,
}

impl BusyGate {
    /// Create an open (unlocked) gate.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Try to close the gate.
    ///
    /// Returns `true` if this call took the gate, `false` if it was already
    /// held. Never blocks.
    #[inline]
    pub fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Open the gate.
    ///
    /// Returns `true` if the gate was held. A `false` return means the caller
    /// released a gate it did not hold; the state is left open either way.
    #[inline]
    pub fn release(&self) -> bool {
        self.locked.swap(false, Ordering::Release)
    }

    /// Check whether the gate is currently held.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::sync::atomic::AtomicUsize;

    #[test]
    fn new_gate_is_open() {
        let gate = BusyGate::new();
        assert!(!gate.is_locked());
    }

    #[test]
    fn try_acquire_is_exclusive() {
        let gate = BusyGate::new();
        assert!(gate.try_acquire());
        assert!(gate.is_locked());
        assert!(!gate.try_acquire());
        assert!(gate.is_locked());
    }

    #[test]
    fn release_reports_whether_held() {
        let gate = BusyGate::new();
        assert!(!gate.release());
        assert!(gate.try_acquire());
        assert!(gate.release());
        assert!(!gate.is_locked());
        assert!(!gate.release());
    }

    #[test]
    fn gate_can_be_reacquired_after_release() {
        let gate = BusyGate::new();
        for _ in 0..3 {
            assert!(gate.try_acquire());
            gate.release();
        }
    }

    #[test]
    fn only_one_thread_wins() {
        let gate = BusyGate::new();
        let winners = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    if gate.try_acquire() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
