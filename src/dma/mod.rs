//! Scatter-gather DMA descriptors
//!
//! - [`item`] - descriptor item, width/chunk encodings and per-mode profiles
//! - [`chain`] - splitting a buffer into a linked chain and submitting it
//!
//! Channel allocation and scheduling stay with the
//! [`DmaController`](crate::hal::DmaController) implementation.

pub mod chain;
pub mod item;

pub use chain::{ChainDirection, ChainInfo, ChainPlan, submit_chain};
pub use item::{AddressUpdate, ChunkSize, DataWidth, DescriptorItem, TransferProfile};
