//! AES engine driver and transfer dispatch
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`mode`] - Mode policy table
//! - [`job`] - Transfer job, buffer regions and callbacks
//! - [`completion`] - Finalization paths shared with the TWI bus layer
//! - [`aes`] - The engine itself
//!
//! # Example
//!
//! ```ignore
//! use sam_xfer::driver::{AesConfig, AesEngine, AesMode, Callback, TransferStrategy};
//!
//! static AES: AesEngine<Sama5Aes, L1Cache> = AesEngine::new(Sama5Aes, L1Cache);
//!
//! AES.configure(
//!     AesConfig::new()
//!         .with_mode(AesMode::Cbc)
//!         .with_key128(KEY)
//!         .with_iv(IV)
//!         .with_strategy(TransferStrategy::Dma),
//! )?;
//! AES.transfer(&mut xdmac, &mut delay, &plain, &mut cipher, Some(Callback::new(done, 0)))?;
//! ```

pub mod aes;
pub mod completion;
pub mod config;
pub mod job;
pub mod mode;

pub use aes::AesEngine;
pub use config::{AesConfig, AesMode, CfbSize, Direction, KeySize, TransferStrategy};
pub use job::{Callback, DmaJob, JobState, Region, TransferJob};
pub use mode::profile_for;
