//! Configuration types for TWI buses

use crate::constants::DEFAULT_TWI_FREQ_HZ;
use crate::hal::twi::TwiTransferMode;

/// Slave addressing width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressMode {
    /// 7-bit slave addresses
    #[default]
    SevenBit,
    /// 10-bit slave addresses
    TenBit,
}

/// Per-bus configuration
///
/// `transfer_mode` and `use_fifo` are runtime knobs: they can also be
/// changed through the registry after configuration and are read at every
/// transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiBusConfig {
    /// Bus clock in Hz
    pub freq_hz: u32,
    /// Slave addressing width
    pub address_mode: AddressMode,
    /// How the controller moves bytes
    pub transfer_mode: TwiTransferMode,
    /// Use the controller FIFO (only honored with the `twi-fifo` feature)
    pub use_fifo: bool,
}

impl Default for TwiBusConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TwiBusConfig {
    /// Standard-mode clock, 7-bit addressing, polling, no FIFO
    #[must_use]
    pub const fn new() -> Self {
        Self {
            freq_hz: DEFAULT_TWI_FREQ_HZ,
            address_mode: AddressMode::SevenBit,
            transfer_mode: TwiTransferMode::Polling,
            use_fifo: false,
        }
    }

    /// Set the bus clock
    #[must_use]
    pub const fn with_freq_hz(mut self, freq_hz: u32) -> Self {
        self.freq_hz = freq_hz;
        self
    }

    /// Set the addressing width
    #[must_use]
    pub const fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Set the transfer mode
    #[must_use]
    pub const fn with_transfer_mode(mut self, mode: TwiTransferMode) -> Self {
        self.transfer_mode = mode;
        self
    }

    /// Request FIFO use
    #[must_use]
    pub const fn with_fifo(mut self, enabled: bool) -> Self {
        self.use_fifo = enabled;
        self
    }
}
