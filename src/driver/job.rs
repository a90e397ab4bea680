//! Transfer job bookkeeping
//!
//! A [`TransferJob`] lives in the engine's job slot from gate acquisition
//! until finalization. The DMA interrupt path reads it to find the output
//! region and the receiving channel; nothing else outlives the transfer.

use crate::dma::ChainInfo;
use crate::hal::dma::ChannelId;

/// Address range of a caller buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    /// Start address
    pub addr: usize,
    /// Length in bytes
    pub len: usize,
}

impl Region {
    /// Region covering `buf`
    pub fn of(buf: &[u8]) -> Self {
        Self {
            addr: buf.as_ptr() as usize,
            len: buf.len(),
        }
    }

    /// Region covering a mutable `buf`
    pub fn of_mut(buf: &mut [u8]) -> Self {
        Self {
            addr: buf.as_mut_ptr() as usize,
            len: buf.len(),
        }
    }
}

/// Completion callback with its opaque argument
///
/// Runs in the context that finalizes the transfer: the foreground for
/// crypto transfers and synchronous bus transfers, the bus interrupt for
/// asynchronous bus transfers.
#[derive(Debug, Clone, Copy)]
pub struct Callback {
    func: fn(usize),
    arg: usize,
}

impl Callback {
    /// Wrap `func`, to be called with `arg`
    pub const fn new(func: fn(usize), arg: usize) -> Self {
        Self { func, arg }
    }

    /// Call the function with the stored argument
    #[inline]
    pub fn invoke(self) {
        (self.func)(self.arg);
    }
}

/// DMA resources held by a running job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaJob {
    /// Memory to engine channel
    pub tx: Option<ChannelId>,
    /// Engine to memory channel; its completion finalizes the job
    pub rx: Option<ChannelId>,
    /// Chain submitted on `tx`
    pub tx_chain: ChainInfo,
    /// Chain submitted on `rx`
    pub rx_chain: ChainInfo,
}

/// Job progress as seen by the completion path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobState {
    /// Data is moving
    Running,
    /// Output is coherent and the gate was released
    Completed,
}

/// In-flight transfer
#[derive(Debug, Clone, Copy)]
pub struct TransferJob {
    /// Output buffer
    pub output: Region,
    /// Completion callback
    pub callback: Option<Callback>,
    /// DMA channels, when running on the DMA strategy
    pub dma: Option<DmaJob>,
    /// Progress
    pub state: JobState,
}

impl TransferJob {
    /// New running job without DMA resources
    pub const fn new(output: Region, callback: Option<Callback>) -> Self {
        Self {
            output,
            callback,
            dma: None,
            state: JobState::Running,
        }
    }

    /// Whether `channel` is this job's receiving channel
    pub fn is_rx_channel(&self, channel: ChannelId) -> bool {
        self.dma.and_then(|dma| dma.rx) == Some(channel)
    }
}
