//! Testing utilities and mock implementations
//!
//! Mocks for every collaborator trait in [`crate::hal`], so the engines can
//! be driven end to end on the host.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::vec::Vec;

use crate::constants::{AES_IV_SIZE, DMA_MAX_BLOCK_LEN};
use crate::dma::DescriptorItem;
use crate::driver::config::{AesMode, CfbSize, Direction, KeySize};
use crate::error::{ConfigError, ConfigResult, DmaError, DmaResult, IoError, IoResult};
use crate::hal::aes::{AES_INT_DATRDY, AesRegisters, StartMode};
use crate::hal::cache::CacheMaintenance;
use crate::hal::dma::{ChannelId, DmaClient, DmaController, DmaPeripheral, ItemId};
use crate::hal::twi::{TwiBuffer, TwiController, TwiStatus, TwiTransferMode};
use crate::twi::TwiBusConfig;

/// Stand-in cipher used by the mocks: every byte XORed with 0xA5
pub fn xor_transform(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| b ^ 0xA5).collect()
}

// =============================================================================
// Mock AES Registers
// =============================================================================

/// Base of the SAMA5D2 AES block
const AES_BASE: usize = 0xF002_C000;

/// Mock AES register block
///
/// Records every setting and counts register accesses. A loaded unit is
/// processed (with [`xor_transform`]) when all input is written in auto
/// start mode, or on `start()` in manual mode; completion sets DATRDY in
/// the status register. `wedged` suppresses completion.
#[derive(Debug, Default)]
pub struct MockAesRegisters {
    /// Number of register operations performed
    pub accesses: usize,
    pub resets: usize,
    pub op_mode: Option<AesMode>,
    pub key_size: Option<KeySize>,
    pub cfb_size: Option<CfbSize>,
    pub key: Vec<u8>,
    pub iv: Option<[u8; AES_IV_SIZE]>,
    pub direction: Option<Direction>,
    pub start_mode: Option<StartMode>,
    pub enabled_interrupts: u32,
    pub status_bits: u32,
    pub input: Vec<u8>,
    pub output: Vec<u8>,
    pub units_processed: usize,
    pub starts: usize,
    pub wedged: bool,
}

impl MockAesRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    fn process(&mut self) {
        if self.wedged {
            return;
        }
        self.output = xor_transform(&self.input);
        self.status_bits |= AES_INT_DATRDY;
        self.units_processed += 1;
    }
}

impl AesRegisters for MockAesRegisters {
    fn soft_reset(&mut self) {
        self.accesses += 1;
        self.resets += 1;
        self.op_mode = None;
        self.key_size = None;
        self.cfb_size = None;
        self.key.clear();
        self.iv = None;
        self.status_bits = 0;
        self.enabled_interrupts = 0;
    }

    fn set_op_mode(&mut self, mode: AesMode) {
        self.accesses += 1;
        self.op_mode = Some(mode);
    }

    fn set_key_size(&mut self, size: KeySize) {
        self.accesses += 1;
        self.key_size = Some(size);
    }

    fn set_cfb_size(&mut self, size: CfbSize) {
        self.accesses += 1;
        self.cfb_size = Some(size);
    }

    fn write_key(&mut self, key: &[u8]) {
        self.accesses += 1;
        self.key = key.to_vec();
    }

    fn write_iv(&mut self, iv: &[u8; AES_IV_SIZE]) {
        self.accesses += 1;
        self.iv = Some(*iv);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.accesses += 1;
        self.direction = Some(direction);
    }

    fn set_start_mode(&mut self, mode: StartMode) {
        self.accesses += 1;
        self.start_mode = Some(mode);
    }

    fn enable_interrupt(&mut self, mask: u32) {
        self.accesses += 1;
        self.enabled_interrupts |= mask;
    }

    fn disable_interrupt(&mut self, mask: u32) {
        self.accesses += 1;
        self.enabled_interrupts &= !mask;
    }

    fn status(&mut self) -> u32 {
        self.accesses += 1;
        self.status_bits
    }

    fn write_input(&mut self, data: &[u8]) {
        self.accesses += 1;
        self.input = data.to_vec();
        if self.start_mode == Some(StartMode::Auto) {
            self.process();
        }
    }

    fn read_output(&mut self, data: &mut [u8]) {
        self.accesses += 1;
        let len = data.len().min(self.output.len());
        data[..len].copy_from_slice(&self.output[..len]);
        self.status_bits &= !AES_INT_DATRDY;
    }

    fn start(&mut self) {
        self.accesses += 1;
        self.starts += 1;
        self.process();
    }

    fn input_data_addr(&self) -> usize {
        AES_BASE + 0x40
    }

    fn output_data_addr(&self) -> usize {
        AES_BASE + 0x50
    }
}

// =============================================================================
// Mock Cache
// =============================================================================

/// Records clean and invalidate requests
#[derive(Debug, Default)]
pub struct MockCache {
    cleaned: RefCell<Vec<(usize, usize)>>,
    invalidated: RefCell<Vec<(usize, usize)>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleaned(&self) -> Vec<(usize, usize)> {
        self.cleaned.borrow().clone()
    }

    pub fn invalidated(&self) -> Vec<(usize, usize)> {
        self.invalidated.borrow().clone()
    }
}

impl CacheMaintenance for MockCache {
    fn clean_region(&self, addr: usize, len: usize) {
        self.cleaned.borrow_mut().push((addr, len));
    }

    fn invalidate_region(&self, addr: usize, len: usize) {
        self.invalidated.borrow_mut().push((addr, len));
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

fn no_hook() {}

/// Mock delay that records time and optionally runs a hook on every delay
///
/// The hook stands in for interrupts firing while the foreground waits:
///
/// ```ignore
/// let mut delay = MockDelay::with_hook(|| {
///     engine.on_interrupt();
/// });
/// ```
#[derive(Debug)]
pub struct MockDelay<F = fn()> {
    total_ns: u64,
    hook: F,
}

impl MockDelay<fn()> {
    /// Create a new mock delay without a hook
    pub fn new() -> Self {
        Self {
            total_ns: 0,
            hook: no_hook,
        }
    }
}

impl Default for MockDelay<fn()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FnMut()> MockDelay<F> {
    /// Create a mock delay that calls `hook` after every delay
    pub fn with_hook(hook: F) -> Self {
        Self { total_ns: 0, hook }
    }
}

impl<F> MockDelay<F> {
    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Reset the delay counter
    pub fn reset(&mut self) {
        self.total_ns = 0;
    }
}

impl<F: FnMut()> embedded_hal::delay::DelayNs for MockDelay<F> {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        (self.hook)();
    }
}

// =============================================================================
// Mock DMA Controller
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct MockItem {
    id: ItemId,
    desc: Option<DescriptorItem>,
    next: Option<ItemId>,
}

struct MockChannel<'a> {
    src: DmaPeripheral,
    dst: DmaPeripheral,
    items: Vec<MockItem>,
    head: Option<ItemId>,
    client: Option<&'a dyn DmaClient>,
    started: bool,
    done: bool,
}

impl MockChannel<'_> {
    fn chain(&self) -> Vec<DescriptorItem> {
        let mut chain = Vec::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(item) = self.items.iter().find(|item| item.id == id) else {
                break;
            };
            if let Some(desc) = item.desc {
                chain.push(desc);
            }
            cursor = item.next;
        }
        chain
    }
}

/// Mock scatter-gather DMA controller
///
/// Keeps real item links so tests can inspect built chains. On `poll`, once
/// a memory-to-peripheral and a peripheral-to-memory channel are both
/// started, it reads the whole tx chain from memory, applies
/// [`xor_transform`], writes the result along the rx chain, and reports
/// completion on tx then rx.
///
/// - `stall_polls`: number of polls that make no progress first
/// - `wedged`: never complete
pub struct MockDma<'a, const MAX_BLOCK_LEN: u32 = DMA_MAX_BLOCK_LEN> {
    channels: Vec<Option<MockChannel<'a>>>,
    channel_limit: usize,
    item_pool: usize,
    next_item: u16,
    freed: usize,
    started: Vec<Vec<DescriptorItem>>,
    pub stall_polls: usize,
    pub wedged: bool,
}

impl<'a, const MAX_BLOCK_LEN: u32> MockDma<'a, MAX_BLOCK_LEN> {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            channel_limit: 8,
            item_pool: 256,
            next_item: 0,
            freed: 0,
            started: Vec::new(),
            stall_polls: 0,
            wedged: false,
        }
    }

    /// Controller with only `limit` channels
    pub fn with_channel_limit(limit: usize) -> Self {
        Self {
            channel_limit: limit,
            ..Self::new()
        }
    }

    /// Controller with only `items` descriptor items
    pub fn with_item_pool(items: usize) -> Self {
        Self {
            item_pool: items,
            ..Self::new()
        }
    }

    /// Channels currently allocated
    pub fn channels_allocated(&self) -> usize {
        self.channels.iter().flatten().count()
    }

    /// Channels freed so far
    pub fn channels_freed(&self) -> usize {
        self.freed
    }

    /// Items of the chain configured on `channel`, in link order
    pub fn chain(&self, channel: ChannelId) -> Vec<DescriptorItem> {
        self.channel(channel).map(MockChannel::chain).unwrap_or_default()
    }

    /// Head item configured on `channel`
    pub fn head(&self, channel: ChannelId) -> Option<ItemId> {
        self.channel(channel).and_then(|ch| ch.head)
    }

    /// Chains of every started channel, in start order
    pub fn started_chains(&self) -> Vec<Vec<DescriptorItem>> {
        self.started.clone()
    }

    fn channel(&self, channel: ChannelId) -> Option<&MockChannel<'a>> {
        self.channels.get(usize::from(channel.0)).and_then(Option::as_ref)
    }

    fn channel_mut(&mut self, channel: ChannelId) -> Option<&mut MockChannel<'a>> {
        self.channels
            .get_mut(usize::from(channel.0))
            .and_then(Option::as_mut)
    }

    fn item_mut(&mut self, channel: ChannelId, item: ItemId) -> Option<&mut MockItem> {
        self.channel_mut(channel)
            .and_then(|ch| ch.items.iter_mut().find(|slot| slot.id == item))
    }

    fn find_ready(&self, src_is_memory: bool) -> Option<usize> {
        self.channels.iter().position(|slot| {
            slot.as_ref().is_some_and(|ch| {
                ch.started && !ch.done && (ch.src == DmaPeripheral::Memory) == src_is_memory
            })
        })
    }

    fn run_pair(&mut self, tx: usize, rx: usize) {
        let Some(tx_chain) = self.channels[tx].as_ref().map(MockChannel::chain) else {
            return;
        };
        let Some(rx_chain) = self.channels[rx].as_ref().map(MockChannel::chain) else {
            return;
        };

        let mut data = Vec::new();
        for item in &tx_chain {
            // SAFETY: tx items point into a live caller buffer for the
            // duration of the transfer.
            let src = unsafe { core::slice::from_raw_parts(item.src as *const u8, item.byte_len()) };
            data.extend_from_slice(src);
        }
        let data = xor_transform(&data);

        let mut offset = 0;
        for item in &rx_chain {
            let len = item.byte_len().min(data.len().saturating_sub(offset));
            // SAFETY: rx items point into a live caller buffer for the
            // duration of the transfer.
            unsafe {
                core::ptr::copy_nonoverlapping(data[offset..].as_ptr(), item.dst as *mut u8, len);
            }
            offset += len;
        }
    }
}

impl<const MAX_BLOCK_LEN: u32> Default for MockDma<'_, MAX_BLOCK_LEN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const MAX_BLOCK_LEN: u32> DmaController<'a> for MockDma<'a, MAX_BLOCK_LEN> {
    const MAX_BLOCK_LEN: u32 = MAX_BLOCK_LEN;

    fn allocate_channel(&mut self, src: DmaPeripheral, dst: DmaPeripheral) -> Option<ChannelId> {
        if self.channels_allocated() >= self.channel_limit {
            return None;
        }
        let channel = MockChannel {
            src,
            dst,
            items: Vec::new(),
            head: None,
            client: None,
            started: false,
            done: false,
        };
        let index = match self.channels.iter().position(Option::is_none) {
            Some(index) => {
                self.channels[index] = Some(channel);
                index
            }
            None => {
                self.channels.push(Some(channel));
                self.channels.len() - 1
            }
        };
        Some(ChannelId(index as u8))
    }

    fn allocate_item(&mut self, channel: ChannelId) -> Option<ItemId> {
        if self.item_pool == 0 {
            return None;
        }
        let id = ItemId(self.next_item);
        let ch = self.channel_mut(channel)?;
        ch.items.push(MockItem {
            id,
            desc: None,
            next: None,
        });
        self.item_pool -= 1;
        self.next_item += 1;
        Some(id)
    }

    fn prepare_item(&mut self, channel: ChannelId, template: &DescriptorItem, item: ItemId) {
        if let Some(slot) = self.item_mut(channel, item) {
            slot.desc = Some(*template);
        }
    }

    fn link_item(&mut self, channel: ChannelId, item: ItemId, next: Option<ItemId>) {
        if let Some(slot) = self.item_mut(channel, item) {
            slot.next = next;
        }
    }

    fn configure_transfer(&mut self, channel: ChannelId, head: ItemId, _template: &DescriptorItem) {
        if let Some(ch) = self.channel_mut(channel) {
            ch.head = Some(head);
        }
    }

    fn set_client(&mut self, channel: ChannelId, client: &'a dyn DmaClient) {
        if let Some(ch) = self.channel_mut(channel) {
            ch.client = Some(client);
        }
    }

    fn start(&mut self, channel: ChannelId) -> DmaResult<()> {
        let ch = self.channel_mut(channel).ok_or(DmaError::StartFailed)?;
        if ch.head.is_none() {
            return Err(DmaError::StartFailed);
        }
        ch.started = true;
        let chain = ch.chain();
        self.started.push(chain);
        Ok(())
    }

    fn poll(&mut self) {
        if self.wedged {
            return;
        }
        if self.stall_polls > 0 {
            self.stall_polls -= 1;
            return;
        }
        let (Some(tx), Some(rx)) = (self.find_ready(true), self.find_ready(false)) else {
            return;
        };

        self.run_pair(tx, rx);

        let mut notify = Vec::new();
        for index in [tx, rx] {
            if let Some(ch) = self.channels[index].as_mut() {
                ch.done = true;
                if let Some(client) = ch.client {
                    notify.push((client, ChannelId(index as u8)));
                }
            }
        }
        for (client, channel) in notify {
            client.transfer_done(channel);
        }
    }

    fn free_channel(&mut self, channel: ChannelId) {
        if let Some(slot) = self.channels.get_mut(usize::from(channel.0)) {
            if let Some(ch) = slot.take() {
                self.item_pool += ch.items.len();
                self.freed += 1;
            }
        }
    }
}

// =============================================================================
// Mock TWI Controller
// =============================================================================

/// One transfer seen by [`MockTwi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransfer {
    pub slave_addr: u16,
    pub lens: Vec<usize>,
    pub mode: TwiTransferMode,
    pub use_fifo: bool,
}

/// Mock low-level TWI controller
///
/// Polling and DMA transfers fill read segments with 0x5A and complete
/// synchronously. Async transfers never touch the buffers after recording
/// their lengths and stay pending until the next `on_interrupt`.
#[derive(Debug, Default)]
pub struct MockTwi {
    pub configured: Option<TwiBusConfig>,
    pub reject_config: bool,
    pub transfers: Vec<MockTransfer>,
    pub fail_next: Option<IoError>,
    in_flight: bool,
}

impl MockTwi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TwiController for MockTwi {
    fn configure(&mut self, config: &TwiBusConfig) -> ConfigResult<()> {
        if self.reject_config {
            return Err(ConfigError::InvalidConfig);
        }
        self.configured = Some(*config);
        Ok(())
    }

    fn transfer(
        &mut self,
        slave_addr: u16,
        buffers: &mut [TwiBuffer<'_>],
        mode: TwiTransferMode,
        use_fifo: bool,
    ) -> IoResult<TwiStatus> {
        if let Some(e) = self.fail_next.take() {
            return Err(e);
        }

        if mode != TwiTransferMode::Async {
            for buffer in buffers.iter_mut() {
                if let TwiBuffer::Read(data) = buffer {
                    data.fill(0x5A);
                }
            }
        }
        self.transfers.push(MockTransfer {
            slave_addr,
            lens: buffers.iter().map(TwiBuffer::len).collect(),
            mode,
            use_fifo,
        });

        if mode == TwiTransferMode::Async {
            self.in_flight = true;
            Ok(TwiStatus::Pending)
        } else {
            Ok(TwiStatus::Complete)
        }
    }

    fn on_interrupt(&mut self) -> bool {
        core::mem::take(&mut self.in_flight)
    }
}
