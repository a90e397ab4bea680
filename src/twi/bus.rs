//! Bus registry and per-bus locking
//!
//! The low-level controller of each bus sits in a [`ClaimCell`], so a
//! synchronous transfer moves its bytes with interrupts enabled. A bus
//! interrupt that arrives while the foreground holds the controller is
//! recorded and serviced by the foreground as soon as it lets go.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

#[cfg(feature = "log")]
use log::warn;

use super::config::TwiBusConfig;
use crate::constants::{POLL_INTERVAL_US, TWI_IFACE_COUNT};
use crate::driver::completion::{abort, finish};
use crate::driver::job::Callback;
use crate::error::{ConfigError, ConfigResult, IoError, IoResult, LockError, LockResult, Result};
use crate::hal::twi::{TwiBuffer, TwiController, TwiStatus, TwiTransferMode};
use crate::sync::{BusyGate, ClaimCell, CriticalSectionCell};

// =============================================================================
// Bus Identifier
// =============================================================================

/// Index of a bus in a registry of `N` buses
///
/// Always in range; out-of-range indices are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusId<const N: usize = TWI_IFACE_COUNT>(u8);

impl<const N: usize> BusId<N> {
    /// Bus `index`, or `None` if `index >= N`
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < N {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Numeric index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl<const N: usize> TryFrom<u8> for BusId<N> {
    type Error = ConfigError;

    fn try_from(index: u8) -> ConfigResult<Self> {
        Self::new(index).ok_or(ConfigError::InvalidBus)
    }
}

// =============================================================================
// Bus Descriptor
// =============================================================================

struct TwiBus<T> {
    twid: ClaimCell<T>,
    /// Interrupt that found `twid` claimed
    deferred_irq: AtomicBool,
    config: CriticalSectionCell<TwiBusConfig>,
    gate: BusyGate,
    transaction: BusyGate,
    callback: CriticalSectionCell<Option<Callback>>,
}

impl<T> TwiBus<T> {
    const fn new(twid: T) -> Self {
        Self {
            twid: ClaimCell::new(twid),
            deferred_irq: AtomicBool::new(false),
            config: CriticalSectionCell::new(TwiBusConfig::new()),
            gate: BusyGate::new(),
            transaction: BusyGate::new(),
            callback: CriticalSectionCell::new(None),
        }
    }

    /// Callback, then gate. The transaction stays open.
    fn complete(&self) {
        let callback = self.callback.with(Option::take);
        finish(&self.gate, callback);
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Caller-owned set of `N` TWI buses
pub struct TwiBusRegistry<T, const N: usize = TWI_IFACE_COUNT> {
    buses: [TwiBus<T>; N],
}

impl<T, const N: usize> TwiBusRegistry<T, N> {
    /// Wrap one low-level controller per bus; bus `i` drives `controllers[i]`
    pub fn new(controllers: [T; N]) -> Self {
        Self {
            buses: controllers.map(TwiBus::new),
        }
    }

    #[inline]
    fn bus(&self, id: BusId<N>) -> &TwiBus<T> {
        &self.buses[id.index()]
    }

    /// Check whether a transfer is in flight on `id`
    pub fn is_busy(&self, id: BusId<N>) -> bool {
        self.bus(id).gate.is_locked()
    }

    /// Busy-wait until the transfer on `id` finished
    ///
    /// Asynchronous transfers only finish from [`on_interrupt`](Self::on_interrupt),
    /// so the bus interrupt must be enabled.
    pub fn wait_until_idle(&self, id: BusId<N>) {
        while self.is_busy(id) {
            core::hint::spin_loop();
        }
    }

    /// Bounded [`wait_until_idle`](Self::wait_until_idle)
    pub fn wait_until_idle_timeout<W: DelayNs>(&self, id: BusId<N>, delay: &mut W, timeout_us: u32) -> IoResult<()> {
        let mut elapsed = 0u32;
        while self.is_busy(id) {
            if elapsed >= timeout_us {
                #[cfg(feature = "log")]
                warn!("twi{}: wait timed out", id.index());
                #[cfg(feature = "defmt")]
                defmt::warn!("twi{}: wait timed out", id.index());
                return Err(IoError::Timeout);
            }
            delay.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }
        Ok(())
    }

    /// Open a transaction on `id`
    ///
    /// Fails with [`LockError::TransactionHeld`] if one is already open.
    pub fn start_transaction(&self, id: BusId<N>) -> LockResult<()> {
        if self.bus(id).transaction.try_acquire() {
            Ok(())
        } else {
            Err(LockError::TransactionHeld)
        }
    }

    /// Close the transaction on `id`
    ///
    /// Fails with [`LockError::NotHeld`] (state unchanged) if none is open.
    pub fn stop_transaction(&self, id: BusId<N>) -> LockResult<()> {
        if self.bus(id).transaction.release() {
            Ok(())
        } else {
            #[cfg(feature = "log")]
            warn!("twi{}: stop without open transaction", id.index());
            #[cfg(feature = "defmt")]
            defmt::warn!("twi{}: stop without open transaction", id.index());
            Err(LockError::NotHeld)
        }
    }

    /// Check whether a transaction is open on `id`
    pub fn transaction_pending(&self, id: BusId<N>) -> bool {
        self.bus(id).transaction.is_locked()
    }

    /// Current configuration of `id`
    pub fn config(&self, id: BusId<N>) -> TwiBusConfig {
        self.bus(id).config.get()
    }

    /// Transfer mode used by the next transfer on `id`
    pub fn transfer_mode(&self, id: BusId<N>) -> TwiTransferMode {
        self.bus(id).config.with_ref(|config| config.transfer_mode)
    }

    /// Change the transfer mode; takes effect at the next transfer
    pub fn set_transfer_mode(&self, id: BusId<N>, mode: TwiTransferMode) {
        self.bus(id).config.with(|config| config.transfer_mode = mode);
    }

    /// Use the controller FIFO from the next transfer on
    ///
    /// No effect without the `twi-fifo` feature.
    pub fn fifo_enable(&self, id: BusId<N>) {
        #[cfg(feature = "twi-fifo")]
        self.bus(id).config.with(|config| config.use_fifo = true);
        #[cfg(not(feature = "twi-fifo"))]
        let _ = id;
    }

    /// Stop using the controller FIFO from the next transfer on
    ///
    /// No effect without the `twi-fifo` feature.
    pub fn fifo_disable(&self, id: BusId<N>) {
        #[cfg(feature = "twi-fifo")]
        self.bus(id).config.with(|config| config.use_fifo = false);
        #[cfg(not(feature = "twi-fifo"))]
        let _ = id;
    }

    /// Whether transfers on `id` use the FIFO; always `false` without the
    /// `twi-fifo` feature
    pub fn fifo_is_enabled(&self, id: BusId<N>) -> bool {
        cfg!(feature = "twi-fifo") && self.bus(id).config.with_ref(|config| config.use_fifo)
    }
}

impl<T: TwiController, const N: usize> TwiBusRegistry<T, N> {
    /// Run `f` with exclusive access to the controller of `id`
    ///
    /// Returns `None` if a transfer or the interrupt handler is using the
    /// controller right now. An interrupt that arrives while `f` runs is
    /// serviced once `f` returns.
    pub fn with_controller<R>(&self, id: BusId<N>, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let result = self.bus(id).twid.try_claim(f);
        self.service_deferred(id);
        result
    }

    /// Configure bus `id`
    ///
    /// Clears any stored callback. Rejected with [`LockError::Busy`] while
    /// a transfer is in flight; the transaction lock is left alone.
    pub fn configure(&self, id: BusId<N>, config: TwiBusConfig) -> Result<()> {
        let bus = self.bus(id);
        if !bus.gate.try_acquire() {
            return Err(LockError::Busy.into());
        }

        bus.callback.set(None);
        let Some(result) = bus.twid.try_claim(|twid| twid.configure(&config)) else {
            bus.gate.release();
            return Err(LockError::Busy.into());
        };
        if result.is_ok() {
            bus.config.set(config);
        }
        bus.gate.release();
        self.service_deferred(id);
        result.map_err(Into::into)
    }

    /// Transfer `buffers` to or from `slave_addr` on bus `id`
    ///
    /// Requires an open transaction ([`LockError::NoTransaction`] otherwise,
    /// without touching the Busy Gate). The transaction lock has no owner:
    /// any caller may transfer while some caller holds it, so callers that
    /// share a bus must each bracket their sequence with
    /// [`start_transaction`](Self::start_transaction) and
    /// [`stop_transaction`](Self::stop_transaction).
    ///
    /// Then takes the Busy Gate ([`LockError::Busy`] if held). An empty
    /// buffer list completes at once.
    ///
    /// Synchronous controller modes complete before this returns; interrupts
    /// stay enabled while the controller moves the bytes. In
    /// [`TwiTransferMode::Async`] the controller may report the transfer as
    /// pending; it then completes from [`on_interrupt`](Self::on_interrupt).
    /// Read segments borrow the caller's memory only for this call, so they
    /// are rejected in async mode with [`ConfigError::AsyncRead`] before the
    /// gate is taken.
    ///
    /// Either way `callback` runs once, before the Busy Gate opens. A
    /// controller error at submission opens the gate and is returned; the
    /// callback does not run.
    pub fn transfer(
        &self,
        id: BusId<N>,
        slave_addr: u16,
        buffers: &mut [TwiBuffer<'_>],
        callback: Option<Callback>,
    ) -> Result<()> {
        let bus = self.bus(id);

        if !bus.transaction.is_locked() {
            #[cfg(feature = "log")]
            warn!("twi{}: no opened transaction on the bus", id.index());
            #[cfg(feature = "defmt")]
            defmt::warn!("twi{}: no opened transaction on the bus", id.index());
            return Err(LockError::NoTransaction.into());
        }

        let config = bus.config.get();
        if config.transfer_mode == TwiTransferMode::Async
            && buffers.iter().any(|buffer| matches!(buffer, TwiBuffer::Read(_)))
        {
            return Err(ConfigError::AsyncRead.into());
        }

        if !bus.gate.try_acquire() {
            return Err(LockError::Busy.into());
        }

        if buffers.is_empty() {
            finish(&bus.gate, callback);
            return Ok(());
        }

        bus.callback.set(callback);
        let use_fifo = cfg!(feature = "twi-fifo") && config.use_fifo;

        let claimed = bus
            .twid
            .try_claim(|twid| twid.transfer(slave_addr, buffers, config.transfer_mode, use_fifo));
        let Some(submitted) = claimed else {
            bus.callback.set(None);
            bus.gate.release();
            return Err(LockError::Busy.into());
        };

        let result = match submitted {
            Ok(TwiStatus::Complete) => {
                bus.complete();
                Ok(())
            }
            Ok(TwiStatus::Pending) => Ok(()),
            Err(e) => {
                bus.callback.set(None);
                abort(&bus.gate, "twi submission failed");
                Err(e.into())
            }
        };

        self.service_deferred(id);
        result
    }

    /// TWI interrupt entry point for bus `id`
    ///
    /// Services the controller and, if a pending transfer finished, runs the
    /// callback and opens the Busy Gate. Returns whether a transfer finished.
    ///
    /// If the foreground is using the controller, the interrupt is recorded
    /// and serviced by the foreground when it releases the controller; this
    /// call then returns `false`.
    pub fn on_interrupt(&self, id: BusId<N>) -> bool {
        let bus = self.bus(id);
        let Some(done) = bus.twid.try_claim(TwiController::on_interrupt) else {
            bus.deferred_irq.store(true, Ordering::Release);
            return false;
        };

        if done && bus.gate.is_locked() {
            bus.complete();
            true
        } else {
            false
        }
    }

    /// Run an interrupt that arrived while the foreground held the controller
    fn service_deferred(&self, id: BusId<N>) {
        if self.bus(id).deferred_irq.swap(false, Ordering::AcqRel) {
            self.on_interrupt(id);
        }
    }
}
