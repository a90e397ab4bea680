//! Configuration types for the AES engine

use crate::constants::{AES_IV_SIZE, AES_MAX_KEY_SIZE, DEFAULT_WAIT_TIMEOUT_US};
use crate::dma::TransferProfile;
use crate::error::{ConfigError, ConfigResult};
use crate::hal::aes::StartMode;

use super::mode::profile_for;

/// AES chaining mode (AES_MR.OPMOD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AesMode {
    /// Electronic codebook (no IV)
    #[default]
    Ecb = 0,
    /// Cipher block chaining
    Cbc = 1,
    /// Output feedback
    Ofb = 2,
    /// Cipher feedback; data size selected by [`CfbSize`]
    Cfb = 3,
    /// Counter
    Ctr = 4,
    /// Galois/counter
    Gcm = 5,
}

impl TryFrom<u8> for AesMode {
    type Error = ConfigError;

    fn try_from(raw: u8) -> ConfigResult<Self> {
        match raw {
            0 => Ok(Self::Ecb),
            1 => Ok(Self::Cbc),
            2 => Ok(Self::Ofb),
            3 => Ok(Self::Cfb),
            4 => Ok(Self::Ctr),
            5 => Ok(Self::Gcm),
            _ => Err(ConfigError::InvalidMode),
        }
    }
}

/// CFB data size (AES_MR.CFBS); ignored outside CFB mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CfbSize {
    /// 128-bit feedback
    #[default]
    Cfb128 = 0,
    /// 64-bit feedback
    Cfb64 = 1,
    /// 32-bit feedback
    Cfb32 = 2,
    /// 16-bit feedback
    Cfb16 = 3,
    /// 8-bit feedback
    Cfb8 = 4,
}

impl TryFrom<u8> for CfbSize {
    type Error = ConfigError;

    fn try_from(raw: u8) -> ConfigResult<Self> {
        match raw {
            0 => Ok(Self::Cfb128),
            1 => Ok(Self::Cfb64),
            2 => Ok(Self::Cfb32),
            3 => Ok(Self::Cfb16),
            4 => Ok(Self::Cfb8),
            _ => Err(ConfigError::InvalidMode),
        }
    }
}

/// AES key size (AES_MR.KEYSIZE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeySize {
    /// 128-bit key
    #[default]
    Aes128 = 0,
    /// 192-bit key
    Aes192 = 1,
    /// 256-bit key
    Aes256 = 2,
}

impl KeySize {
    /// Key length in bytes
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }
}

impl TryFrom<u8> for KeySize {
    type Error = ConfigError;

    fn try_from(raw: u8) -> ConfigResult<Self> {
        match raw {
            0 => Ok(Self::Aes128),
            1 => Ok(Self::Aes192),
            2 => Ok(Self::Aes256),
            _ => Err(ConfigError::InvalidMode),
        }
    }
}

/// Cipher direction (AES_MR.CIPHER)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Encrypt
    #[default]
    Encrypt,
    /// Decrypt
    Decrypt,
}

/// How a transfer moves data through the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TransferStrategy {
    /// Poll per unit, software writes START
    PollingManual = 0,
    /// Poll per unit, engine starts once input is loaded
    #[default]
    PollingAuto = 1,
    /// Stream both directions with the DMA controller
    Dma = 2,
}

impl TransferStrategy {
    /// Engine start mode used by this strategy
    #[must_use]
    pub const fn start_mode(self) -> StartMode {
        match self {
            TransferStrategy::PollingManual => StartMode::Manual,
            TransferStrategy::PollingAuto => StartMode::Auto,
            TransferStrategy::Dma => StartMode::Dma,
        }
    }
}

impl TryFrom<u8> for TransferStrategy {
    type Error = ConfigError;

    fn try_from(raw: u8) -> ConfigResult<Self> {
        match raw {
            0 => Ok(Self::PollingManual),
            1 => Ok(Self::PollingAuto),
            2 => Ok(Self::Dma),
            _ => Err(ConfigError::UnknownStrategy),
        }
    }
}

/// AES engine configuration
///
/// # Example
///
/// ```ignore
/// let config = AesConfig::new()
///     .with_mode(AesMode::Cbc)
///     .with_key128(KEY)
///     .with_iv(IV)
///     .with_strategy(TransferStrategy::Dma);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AesConfig {
    /// Chaining mode
    pub mode: AesMode,
    /// CFB data size
    pub cfb_size: CfbSize,
    /// Key size; selects how many bytes of `key` are loaded
    pub key_size: KeySize,
    /// Key material, left-aligned
    pub key: [u8; AES_MAX_KEY_SIZE],
    /// Initialization vector (unused in ECB)
    pub iv: [u8; AES_IV_SIZE],
    /// Encrypt or decrypt
    pub direction: Direction,
    /// Execution strategy
    pub strategy: TransferStrategy,
    /// Wait budget for one transfer (DMA) or one unit (polling)
    pub wait_timeout_us: u32,
}

impl Default for AesConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AesConfig {
    /// ECB, 128-bit zero key, encrypt, auto-start polling
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: AesMode::Ecb,
            cfb_size: CfbSize::Cfb128,
            key_size: KeySize::Aes128,
            key: [0; AES_MAX_KEY_SIZE],
            iv: [0; AES_IV_SIZE],
            direction: Direction::Encrypt,
            strategy: TransferStrategy::PollingAuto,
            wait_timeout_us: DEFAULT_WAIT_TIMEOUT_US,
        }
    }

    /// Set the chaining mode
    #[must_use]
    pub const fn with_mode(mut self, mode: AesMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the CFB data size
    #[must_use]
    pub const fn with_cfb_size(mut self, size: CfbSize) -> Self {
        self.cfb_size = size;
        self
    }

    /// Load a 128-bit key
    #[must_use]
    pub const fn with_key128(self, key: [u8; 16]) -> Self {
        self.with_key_bytes(KeySize::Aes128, &key)
    }

    /// Load a 192-bit key
    #[must_use]
    pub const fn with_key192(self, key: [u8; 24]) -> Self {
        self.with_key_bytes(KeySize::Aes192, &key)
    }

    /// Load a 256-bit key
    #[must_use]
    pub const fn with_key256(self, key: [u8; 32]) -> Self {
        self.with_key_bytes(KeySize::Aes256, &key)
    }

    const fn with_key_bytes(mut self, size: KeySize, key: &[u8]) -> Self {
        self.key = [0; AES_MAX_KEY_SIZE];
        let mut i = 0;
        while i < key.len() {
            self.key[i] = key[i];
            i += 1;
        }
        self.key_size = size;
        self
    }

    /// Set the initialization vector
    #[must_use]
    pub const fn with_iv(mut self, iv: [u8; AES_IV_SIZE]) -> Self {
        self.iv = iv;
        self
    }

    /// Set the cipher direction
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the execution strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: TransferStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the wait budget in microseconds
    #[must_use]
    pub const fn with_wait_timeout_us(mut self, timeout_us: u32) -> Self {
        self.wait_timeout_us = timeout_us;
        self
    }

    /// Key bytes actually loaded into the engine
    pub fn key_bytes(&self) -> &[u8] {
        &self.key[..self.key_size.key_len()]
    }

    /// Whether this mode uses the IV
    #[must_use]
    pub const fn uses_iv(&self) -> bool {
        !matches!(self.mode, AesMode::Ecb)
    }

    /// DMA and alignment parameters for this mode
    #[must_use]
    pub const fn profile(&self) -> TransferProfile {
        profile_for(self.mode, self.cfb_size)
    }
}
