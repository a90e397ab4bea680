//! Scatter-gather chain builder
//!
//! Splits one memory buffer into linked descriptor items that stream it to
//! (or from) a fixed peripheral data register. Each item carries at most
//! `max_block_len` elements; the element counts of a chain always sum to
//! `len / data_width`.

#[cfg(feature = "log")]
use log::debug;

use super::item::{AddressUpdate, DescriptorItem, TransferProfile};
use crate::error::{DmaError, DmaResult};
use crate::hal::dma::{ChannelId, DmaController, ItemId};

/// Which side of the chain is the memory buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChainDirection {
    /// Memory buffer to peripheral register (engine input)
    MemToPeriph,
    /// Peripheral register to memory buffer (engine output)
    PeriphToMem,
}

/// Lazily computed descriptor items of one chain
///
/// Iterating yields items in submission order.
#[derive(Debug, Clone)]
pub struct ChainPlan {
    buf_addr: usize,
    fixed_addr: usize,
    direction: ChainDirection,
    profile: TransferProfile,
    max_block_len: u32,
    /// Elements not yet covered by a yielded item
    remaining: usize,
    /// Byte offset of the next item into the buffer
    offset: usize,
}

impl ChainPlan {
    /// Plan a chain over `len` bytes at `buf_addr`
    ///
    /// `len` must be a multiple of the profile's element width; a trailing
    /// partial element is not transferred.
    pub fn new(
        buf_addr: usize,
        len: usize,
        fixed_addr: usize,
        direction: ChainDirection,
        profile: TransferProfile,
        max_block_len: u32,
    ) -> Self {
        let width = profile.data_width.bytes() as usize;
        Self {
            buf_addr,
            fixed_addr,
            direction,
            profile,
            max_block_len: max_block_len.max(1),
            remaining: len / width,
            offset: 0,
        }
    }

    /// Template carrying the settings shared by every item of the chain
    pub fn template(&self) -> DescriptorItem {
        self.item_at(0, 0)
    }

    /// Number of items the chain will contain
    pub fn item_count(&self) -> usize {
        self.remaining.div_ceil(self.max_block_len as usize)
    }

    fn item_at(&self, offset: usize, block_len: u32) -> DescriptorItem {
        let (src, dst, src_update, dst_update) = match self.direction {
            ChainDirection::MemToPeriph => (
                self.buf_addr + offset,
                self.fixed_addr,
                AddressUpdate::INCREMENT,
                AddressUpdate::FIXED,
            ),
            ChainDirection::PeriphToMem => (
                self.fixed_addr,
                self.buf_addr + offset,
                AddressUpdate::FIXED,
                AddressUpdate::INCREMENT,
            ),
        };
        DescriptorItem {
            src,
            dst,
            data_width: self.profile.data_width,
            chunk_size: self.profile.chunk_size,
            block_len,
            src_update,
            dst_update,
        }
    }
}

impl Iterator for ChainPlan {
    type Item = DescriptorItem;

    fn next(&mut self) -> Option<DescriptorItem> {
        if self.remaining == 0 {
            return None;
        }
        let block_len = self.remaining.min(self.max_block_len as usize) as u32;
        let item = self.item_at(self.offset, block_len);
        self.remaining -= block_len as usize;
        self.offset += item.byte_len();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.item_count();
        (count, Some(count))
    }
}

impl ExactSizeIterator for ChainPlan {}

/// Result of submitting a chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChainInfo {
    /// First item, `None` for an empty chain
    pub head: Option<ItemId>,
    /// Number of items linked
    pub items: usize,
}

/// Allocate, program and link every item of `plan` on `channel`, then point
/// the channel at the head.
///
/// Each item is linked behind its predecessor and the last one terminates
/// the chain. On `NoDescriptorsAvailable` the partially built chain stays
/// attached to the channel; freeing the channel releases it. An empty plan
/// allocates nothing and leaves the channel unconfigured.
pub fn submit_chain<'a, D>(dma: &mut D, channel: ChannelId, plan: ChainPlan) -> DmaResult<ChainInfo>
where
    D: DmaController<'a> + ?Sized,
{
    let template = plan.template();
    let mut info = ChainInfo::default();
    let mut prev: Option<ItemId> = None;

    for desc in plan {
        let item = dma
            .allocate_item(channel)
            .ok_or(DmaError::NoDescriptorsAvailable)?;
        dma.prepare_item(channel, &desc, item);
        if let Some(prev) = prev {
            dma.link_item(channel, prev, Some(item));
        } else {
            info.head = Some(item);
        }
        prev = Some(item);
        info.items += 1;
    }

    if let (Some(last), Some(head)) = (prev, info.head) {
        dma.link_item(channel, last, None);
        dma.configure_transfer(channel, head, &template);
    }

    #[cfg(feature = "log")]
    debug!("dma: chain on channel {} with {} items", channel.0, info.items);
    #[cfg(feature = "defmt")]
    defmt::debug!("dma: chain on channel {} with {} items", channel.0, info.items);

    Ok(info)
}
