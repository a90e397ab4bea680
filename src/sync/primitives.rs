//! Synchronization primitives for ISR-safe access.
//!
//! Low-level primitives shared by the crypto engine and the TWI bus layer.

use core::cell::{RefCell, UnsafeCell};
use core::sync::atomic::{AtomicBool, Ordering};
use critical_section::Mutex;

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable access
/// from both normal code and interrupt handlers.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }

    /// Execute a closure with immutable access.
    #[inline]
    pub fn with_ref<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        critical_section::with(|cs| {
            let value = self.inner.borrow_ref(cs);
            f(&value)
        })
    }
}

impl<T: Copy> CriticalSectionCell<T> {
    /// Copy the current value out.
    #[inline]
    pub fn get(&self) -> T {
        self.with_ref(|value| *value)
    }

    /// Replace the current value.
    #[inline]
    pub fn set(&self, value: T) {
        self.with(|slot| *slot = value);
    }
}

// SAFETY: CriticalSectionCell uses critical sections to protect all access.
unsafe impl<T> Sync for CriticalSectionCell<T> {}

/// Cell claimed with an atomic flag instead of a critical section.
///
/// For state whose accesses may block for a long time, such as a bus driver
/// moving a whole transfer. Interrupts stay enabled while the value is
/// borrowed; a second claimant (an interrupt handler preempting the owner,
/// or another core) gets `None` instead of waiting.
pub struct ClaimCell<T> {
    claimed: AtomicBool,
    value: UnsafeCell<T>,
}

impl<T> ClaimCell<T> {
    /// Create an unclaimed cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            claimed: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Run `f` with exclusive access, or return `None` if the cell is
    /// already claimed.
    #[inline]
    pub fn try_claim<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        if self
            .claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }

        struct Unclaim<'c>(&'c AtomicBool);
        impl Drop for Unclaim<'_> {
            fn drop(&mut self) {
                self.0.store(false, Ordering::Release);
            }
        }
        let _unclaim = Unclaim(&self.claimed);

        // SAFETY: the successful compare-exchange above makes this the only
        // live reference until `_unclaim` drops.
        Some(f(unsafe { &mut *self.value.get() }))
    }
}

// SAFETY: access to `value` is serialized by the `claimed` flag.
unsafe impl<T: Send> Sync for ClaimCell<T> {}

/// Single-producer/single-consumer "unit ready" flag.
///
/// The interrupt handler raises the flag with release ordering; the
/// foreground polling loop consumes it with acquire ordering, so every write
/// the handler made before raising is visible once `take` returns `true`.
#[derive(Debug, Default)]
pub struct ReadyFlag {
    raised: AtomicBool,
}

impl ReadyFlag {
    /// Create a lowered flag.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag (interrupt side).
    #[inline]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Lower the flag before arming a new unit.
    #[inline]
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Consume the flag, returning whether it was raised.
    #[inline]
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Peek at the flag without consuming it.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn critical_section_cell_with_mutates() {
        let cell: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
        cell.with(|v| *v += 10);
        assert_eq!(cell.get(), 10);
    }

    #[test]
    fn critical_section_cell_with_returns_value() {
        let cell: CriticalSectionCell<u32> = CriticalSectionCell::new(42);
        let result = cell.with(|v| *v * 2);
        assert_eq!(result, 84);
    }

    #[test]
    fn critical_section_cell_try_with_fails_while_borrowed() {
        let cell: CriticalSectionCell<u32> = CriticalSectionCell::new(1);
        let nested = cell.with(|_| cell.try_with(|v| *v));
        assert_eq!(nested, None);
        assert_eq!(cell.try_with(|v| *v), Some(1));
    }

    #[test]
    fn critical_section_cell_set_replaces() {
        let cell: CriticalSectionCell<Option<u8>> = CriticalSectionCell::new(None);
        cell.set(Some(7));
        assert_eq!(cell.get(), Some(7));
    }

    #[test]
    fn critical_section_cell_static_usage() {
        static CELL: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
        CELL.with(|v| *v = 100);
        assert_eq!(CELL.with_ref(|v| *v), 100);
    }

    #[test]
    fn claim_cell_rejects_nested_claim() {
        let cell = ClaimCell::new(5u32);
        let nested = cell.try_claim(|outer| {
            *outer += 1;
            cell.try_claim(|inner| *inner)
        });
        assert_eq!(nested, Some(None));
        assert!(cell.try_claim(|_| ()).is_some());
        assert_eq!(cell.try_claim(|v| *v), Some(6));
    }

    #[test]
    fn claim_cell_unclaims_on_panic() {
        let cell = ClaimCell::new(0u8);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cell.try_claim(|_| panic!("driver fault"));
        }));
        assert!(result.is_err());
        assert!(cell.try_claim(|_| ()).is_some());
    }

    #[test]
    fn claim_cell_leaves_interrupts_enabled() {
        static OTHER: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
        let cell = ClaimCell::new(());

        cell.try_claim(|()| {
            // a critical section elsewhere is not blocked by the claim
            std::thread::scope(|s| {
                s.spawn(|| OTHER.with(|v| *v += 1));
            });
        });
        assert_eq!(OTHER.get(), 1);
    }

    #[test]
    fn ready_flag_take_consumes() {
        let flag = ReadyFlag::new();
        assert!(!flag.take());
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.is_raised());
        assert!(!flag.take());
    }

    #[test]
    fn ready_flag_clear_discards_stale_raise() {
        let flag = ReadyFlag::new();
        flag.raise();
        flag.clear();
        assert!(!flag.take());
    }

    #[test]
    fn ready_flag_crosses_threads() {
        let flag = ReadyFlag::new();
        std::thread::scope(|s| {
            s.spawn(|| flag.raise());
        });
        assert!(flag.take());
    }
}
