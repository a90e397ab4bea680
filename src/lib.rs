//! SAM Peripheral Transfer Core
//!
//! A `no_std`, `no_alloc` transfer core for SAMA5-class microcontrollers: it
//! coordinates exclusive access to the AES crypto engine and the TWI bus
//! controllers and moves data through them by register polling or by
//! scatter-gather DMA.
//!
//! # Architecture
//!
//! 1. **Sync** ([`sync`]): Busy Gate, unit-ready flag, ISR-safe cells
//! 2. **DMA** ([`dma`]): descriptor items and the scatter-gather chain builder
//! 3. **Engine** ([`driver`]): AES configuration, mode policy, transfer
//!    dispatch (manual/auto polling, DMA) and completion
//! 4. **Bus** ([`twi`]): per-bus transaction lock on top of the Busy Gate
//! 5. **HAL** ([`hal`]): traits for the collaborators the core drives (AES
//!    registers, DMA controller, cache maintenance, low-level TWI driver)
//!
//! Every accepted transfer is finalized exactly once: the user callback runs
//! and the Busy Gate opens, on success and on every transfer-side failure
//! (the callback only on success).
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and defmt log output
//! - `log`: Enable `log` facade output
//! - `twi-fifo`: TWI controllers with a hardware FIFO
//!
//! # Example
//!
//! ```ignore
//! use sam_xfer::{AesConfig, AesEngine, AesMode, TransferStrategy};
//!
//! static AES: AesEngine<Sama5Aes, L1Cache> = AesEngine::new(Sama5Aes, L1Cache);
//!
//! #[interrupt]
//! fn AES() {
//!     AES.on_interrupt();
//! }
//!
//! AES.configure(
//!     AesConfig::new()
//!         .with_mode(AesMode::Ctr)
//!         .with_key256(KEY)
//!         .with_iv(NONCE)
//!         .with_strategy(TransferStrategy::Dma),
//! )?;
//!
//! AES.transfer(&mut xdmac, &mut delay, &plain, &mut cipher, None)?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod dma;
pub mod driver;
pub mod error;
pub mod hal;
pub mod sync;
pub mod twi;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::{
    AesConfig, AesEngine, AesMode, Callback, CfbSize, Direction, KeySize, TransferStrategy,
};
pub use error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, LockError,
    LockResult, Result,
};
pub use sync::BusyGate;
pub use twi::{BusId, TwiBusConfig, TwiBusRegistry};
