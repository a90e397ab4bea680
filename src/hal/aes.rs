//! AES peripheral register interface
//!
//! Register-level access to an AES crypto peripheral (SAMA5D2 AES block).
//! The engine driver in [`crate::driver`] programs the peripheral only
//! through this trait, so it runs unchanged against the memory-mapped
//! block on target and against a mock on the host.

use crate::constants::AES_IV_SIZE;
use crate::driver::config::{AesMode, CfbSize, Direction, KeySize};

// =============================================================================
// Register Bits
// =============================================================================

/// AES_ISR / AES_IER / AES_IDR: data ready
pub const AES_INT_DATRDY: u32 = 1 << 0;

// =============================================================================
// Start Mode
// =============================================================================

/// AES_MR.SMOD: how processing of a loaded input block is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StartMode {
    /// Processing starts when software writes AES_CR.START
    Manual = 0,
    /// Processing starts once all input registers are written
    Auto = 1,
    /// Input and output registers are serviced by DMA requests
    Dma = 2,
}

// =============================================================================
// Register Trait
// =============================================================================

/// AES peripheral register operations
///
/// Implementations are plain register pokes; sequencing (reset before
/// configuration, interrupt enable before start) is the driver's job.
pub trait AesRegisters {
    /// Software reset (AES_CR.SWRST)
    fn soft_reset(&mut self);

    /// Set the chaining mode (AES_MR.OPMOD)
    fn set_op_mode(&mut self, mode: AesMode);

    /// Set the key size (AES_MR.KEYSIZE)
    fn set_key_size(&mut self, size: KeySize);

    /// Set the CFB data size (AES_MR.CFBS)
    fn set_cfb_size(&mut self, size: CfbSize);

    /// Load the key registers (AES_KEYWRx); `key` is 16, 24 or 32 bytes
    fn write_key(&mut self, key: &[u8]);

    /// Load the initialization vector (AES_IVRx)
    fn write_iv(&mut self, iv: &[u8; AES_IV_SIZE]);

    /// Select encryption or decryption (AES_MR.CIPHER)
    fn set_direction(&mut self, direction: Direction);

    /// Select the start mode (AES_MR.SMOD)
    fn set_start_mode(&mut self, mode: StartMode);

    /// Enable the interrupts in `mask` (AES_IER)
    fn enable_interrupt(&mut self, mask: u32);

    /// Disable the interrupts in `mask` (AES_IDR)
    fn disable_interrupt(&mut self, mask: u32);

    /// Read the interrupt status register (AES_ISR)
    fn status(&mut self) -> u32;

    /// Write one unit into the input data registers (AES_IDATARx)
    fn write_input(&mut self, data: &[u8]);

    /// Read one unit from the output data registers (AES_ODATARx)
    fn read_output(&mut self, data: &mut [u8]);

    /// Start processing (AES_CR.START)
    fn start(&mut self);

    /// Bus address of AES_IDATAR0, the fixed DMA destination
    fn input_data_addr(&self) -> usize;

    /// Bus address of AES_ODATAR0, the fixed DMA source
    fn output_data_addr(&self) -> usize;
}
