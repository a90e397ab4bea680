//! TWI (I2C) controller interface
//!
//! The bus layer in [`crate::twi`] adds transaction locking and completion
//! bookkeeping on top of a low-level TWI driver that implements
//! [`TwiController`].

use crate::error::{ConfigError, ConfigResult, IoResult};
use crate::twi::TwiBusConfig;

// =============================================================================
// Transfer Mode
// =============================================================================

/// How the low-level driver moves bytes for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TwiTransferMode {
    /// Busy-poll the status register; completes before `transfer` returns
    #[default]
    Polling = 0,
    /// Move bytes with the DMA controller
    Dma = 1,
    /// Interrupt-driven; completion is reported through `on_interrupt`.
    /// Write-only.
    Async = 2,
}

impl TryFrom<u8> for TwiTransferMode {
    type Error = ConfigError;

    fn try_from(raw: u8) -> ConfigResult<Self> {
        match raw {
            0 => Ok(Self::Polling),
            1 => Ok(Self::Dma),
            2 => Ok(Self::Async),
            _ => Err(ConfigError::UnknownStrategy),
        }
    }
}

// =============================================================================
// Buffers and Status
// =============================================================================

/// One segment of a bus transfer
#[derive(Debug)]
pub enum TwiBuffer<'b> {
    /// Bytes sent to the slave
    Write(&'b [u8]),
    /// Bytes received from the slave
    Read(&'b mut [u8]),
}

impl TwiBuffer<'_> {
    /// Segment length in bytes
    pub fn len(&self) -> usize {
        match self {
            TwiBuffer::Write(data) => data.len(),
            TwiBuffer::Read(data) => data.len(),
        }
    }

    /// Check whether the segment carries no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a successfully submitted transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiStatus {
    /// All segments were moved before `transfer` returned
    Complete,
    /// The controller finishes in the background and reports through
    /// [`TwiController::on_interrupt`]
    Pending,
}

// =============================================================================
// Controller Trait
// =============================================================================

/// Low-level TWI driver operations
///
/// A controller returning [`TwiStatus::Pending`] owns the data movement from
/// then on and must not reference the caller's `buffers` after `transfer`
/// returns; interrupt-driven drivers send from their own staging memory.
/// The bus layer never passes a [`TwiBuffer::Read`] segment in
/// [`TwiTransferMode::Async`], since received bytes would have no caller
/// memory left to land in.
///
/// The bus layer calls `transfer` with interrupts enabled, and never while
/// `on_interrupt` runs for the same controller.
pub trait TwiController {
    /// Apply address, clock and mode settings
    fn configure(&mut self, config: &TwiBusConfig) -> ConfigResult<()>;

    /// Move `buffers` to or from `slave_addr`
    fn transfer(
        &mut self,
        slave_addr: u16,
        buffers: &mut [TwiBuffer<'_>],
        mode: TwiTransferMode,
        use_fifo: bool,
    ) -> IoResult<TwiStatus>;

    /// Service the controller interrupt
    ///
    /// Returns `true` when a pending transfer finished during this call.
    fn on_interrupt(&mut self) -> bool;
}
