//! Error types for the transfer core
//!
//! Errors are organized by domain for better diagnostics:
//! - [`LockError`]: Busy Gate / Transaction Lock contention and ordering
//! - [`ConfigError`]: Validation and configuration failures
//! - [`DmaError`]: DMA channel and descriptor allocation issues
//! - [`IoError`]: Runtime transfer failures (timeouts, bus driver errors)
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Lock Errors
// =============================================================================

/// Lock contention and protocol-ordering errors
///
/// These are always reported synchronously and leave all driver state
/// untouched, so the caller may simply retry later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockError {
    /// A transfer is already in flight on this engine
    Busy,
    /// Another caller already holds the bus transaction
    TransactionHeld,
    /// A bus transfer was attempted without an open transaction
    NoTransaction,
    /// `stop_transaction` was called while no transaction was held
    NotHeld,
}

impl core::fmt::Display for LockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LockError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LockError::Busy => "transfer already in flight",
            LockError::TransactionHeld => "bus transaction already held",
            LockError::NoTransaction => "no opened transaction on the bus",
            LockError::NotHeld => "transaction not held",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Validation and configuration errors
///
/// Buffer validation happens before any register or DMA access, so a
/// `ConfigError` from `transfer` guarantees the hardware was not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Buffer size is not a multiple of the mode's bytes-per-unit
    UnalignedBuffer,
    /// Output buffer cannot hold the processed input
    OutputTooSmall,
    /// Raw transfer strategy value does not name a known strategy
    UnknownStrategy,
    /// Raw mode or sub-mode value is out of range
    InvalidMode,
    /// Bus index is outside the registry
    InvalidBus,
    /// Bus driver rejected the configuration
    InvalidConfig,
    /// Read segments cannot complete asynchronously; the caller's buffer
    /// is only borrowed for the duration of `transfer`
    AsyncRead,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::UnalignedBuffer => "buffer size not a multiple of the unit size",
            ConfigError::OutputTooSmall => "output buffer smaller than input",
            ConfigError::UnknownStrategy => "unknown transfer strategy",
            ConfigError::InvalidMode => "invalid operating mode",
            ConfigError::InvalidBus => "invalid bus index",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::AsyncRead => "read segment in asynchronous transfer mode",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA channel and descriptor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// No free DMA channel for the requested peripheral pair
    NoChannelAvailable,
    /// Descriptor pool exhausted while building a chain
    NoDescriptorsAvailable,
    /// The DMA controller refused to start the channel
    StartFailed,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::NoChannelAvailable => "no DMA channel available",
            DmaError::NoDescriptorsAvailable => "no descriptors available",
            DmaError::StartFailed => "DMA channel start failed",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Engine did not signal completion within the wait budget
    Timeout,
    /// Bus driver reported a failure (NACK, arbitration loss, ...)
    BusFault,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::BusFault => "bus driver fault",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// ```ignore
/// match engine.transfer(&mut dma, &mut delay, &input, &mut output, None) {
///     Err(Error::Lock(LockError::Busy)) => { /* retry later */ }
///     Err(Error::Config(ConfigError::UnalignedBuffer)) => { /* fix caller */ }
///     Err(Error::Io(IoError::Timeout)) => { /* engine wedged */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Lock error
    Lock(LockError),
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Lock(e) => write!(f, "lock: {}", e.as_str()),
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<LockError> for Error {
    fn from(e: LockError) -> Self {
        Error::Lock(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for transfer-core operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for lock operations
pub type LockResult<T> = core::result::Result<T, LockError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
