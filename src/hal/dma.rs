//! DMA controller collaborator interface
//!
//! The scatter-gather DMA controller (XDMAC-class) owns channel and
//! descriptor allocation and its own scheduling. The transfer core only
//! needs the operations below; a board crate implements them on top of its
//! DMA driver.

use crate::constants::DMA_MAX_BLOCK_LEN;
use crate::dma::DescriptorItem;
use crate::error::DmaResult;

/// Handle to an allocated DMA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub u8);

/// Handle to a descriptor item allocated on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ItemId(pub u16);

/// One end of a DMA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaPeripheral {
    /// System memory
    Memory,
    /// Peripheral identified by its interrupt/peripheral ID
    Peripheral(u8),
}

/// Receiver of per-channel completion notifications.
///
/// `transfer_done` runs in the DMA interrupt context (or from
/// [`DmaController::poll`] when the foreground is busy-waiting).
pub trait DmaClient {
    /// The channel finished its whole descriptor chain.
    fn transfer_done(&self, channel: ChannelId);
}

/// Scatter-gather DMA controller.
///
/// The `'a` lifetime bounds the clients registered with
/// [`set_client`](DmaController::set_client).
pub trait DmaController<'a> {
    /// Largest element count one descriptor item may carry.
    const MAX_BLOCK_LEN: u32 = DMA_MAX_BLOCK_LEN;

    /// Allocate a channel moving data from `src` to `dst`.
    fn allocate_channel(&mut self, src: DmaPeripheral, dst: DmaPeripheral) -> Option<ChannelId>;

    /// Allocate one descriptor item for `channel`.
    fn allocate_item(&mut self, channel: ChannelId) -> Option<ItemId>;

    /// Program `item` from `template`.
    fn prepare_item(&mut self, channel: ChannelId, template: &DescriptorItem, item: ItemId);

    /// Link `item` to `next`; `None` terminates the chain.
    fn link_item(&mut self, channel: ChannelId, item: ItemId, next: Option<ItemId>);

    /// Point `channel` at the chain starting at `head`.
    ///
    /// `template` carries the settings shared by every item of the chain.
    fn configure_transfer(&mut self, channel: ChannelId, head: ItemId, template: &DescriptorItem);

    /// Register the completion client for `channel`.
    fn set_client(&mut self, channel: ChannelId, client: &'a dyn DmaClient);

    /// Start `channel`.
    fn start(&mut self, channel: ChannelId) -> DmaResult<()>;

    /// Drive controller progress and dispatch completed channels to their
    /// clients. Must be called while busy-waiting on a DMA transfer.
    fn poll(&mut self);

    /// Stop `channel` and return it, with its items, to the pool.
    fn free_channel(&mut self, channel: ChannelId);
}
