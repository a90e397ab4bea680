//! Centralized Constants
//!
//! Single source of truth for the magic numbers used by the transfer core.
//!
//! # Organization
//!
//! - **DMA**: descriptor block limits
//! - **Timing**: wait budgets and polling intervals
//! - **AES**: block, key and IV sizes
//! - **TWI**: default bus count and clock
//!
//! Register bit definitions stay with the collaborator traits in
//! [`crate::hal`], next to the accessors that use them.

// =============================================================================
// DMA
// =============================================================================

/// Maximum element count of a single XDMAC microblock (24-bit UBLEN field)
pub const DMA_MAX_BLOCK_LEN: u32 = 0x00FF_FFFF;

// =============================================================================
// Timing Constants
// =============================================================================

/// Default wait budget for one transfer (or one AES unit) in microseconds
pub const DEFAULT_WAIT_TIMEOUT_US: u32 = 100_000;

/// Interval between polls of a busy flag in microseconds
pub const POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// AES
// =============================================================================

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// Largest AES key (AES-256) in bytes
pub const AES_MAX_KEY_SIZE: usize = 32;

/// Initialization vector size in bytes
pub const AES_IV_SIZE: usize = 16;

/// AES peripheral ID used as the XDMAC hardware request endpoint
pub const AES_PERIPHERAL_ID: u8 = 12;

// =============================================================================
// TWI
// =============================================================================

/// Number of TWI interfaces on SAMA5D2-class parts
pub const TWI_IFACE_COUNT: usize = 2;

/// Default TWI clock (standard mode) in Hz
pub const DEFAULT_TWI_FREQ_HZ: u32 = 100_000;
