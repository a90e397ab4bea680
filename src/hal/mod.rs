//! Hardware Abstraction Layer
//!
//! Traits for the collaborators the transfer core drives but does not own:
//!
//! - [`aes`] - AES peripheral registers
//! - [`dma`] - scatter-gather DMA controller and its completion callback
//! - [`cache`] - data cache clean/invalidate by range
//! - [`twi`] - low-level TWI controller
//!
//! Board crates implement these on top of their PAC/HAL; the host tests
//! implement them with mocks.

pub mod aes;
pub mod cache;
pub mod dma;
pub mod twi;

pub use aes::{AesRegisters, StartMode};
pub use cache::{CacheMaintenance, NoCache};
pub use dma::{ChannelId, DmaClient, DmaController, DmaPeripheral, ItemId};
pub use twi::{TwiBuffer, TwiController, TwiStatus, TwiTransferMode};
