//! Descriptor item model
//!
//! One [`DescriptorItem`] describes one XDMAC microblock: a source, a
//! destination, an element width, a burst (chunk) size and an element count.
//! Field encodings follow the XDMAC channel configuration register so a
//! controller implementation can program them directly.

/// Width of one DMA element (XDMAC_CC.DWIDTH)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataWidth {
    /// 8-bit elements
    Byte = 0,
    /// 16-bit elements
    HalfWord = 1,
    /// 32-bit elements
    #[default]
    Word = 2,
}

impl DataWidth {
    /// Element size in bytes
    #[inline]
    pub const fn bytes(self) -> u32 {
        1 << (self as u32)
    }
}

/// Elements moved per peripheral request (XDMAC_CC.CSIZE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChunkSize {
    /// 1 element per request
    Chunk1 = 0,
    /// 2 elements per request
    Chunk2 = 1,
    /// 4 elements per request
    #[default]
    Chunk4 = 2,
    /// 8 elements per request
    Chunk8 = 3,
    /// 16 elements per request
    Chunk16 = 4,
}

/// Address progression of one side of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressUpdate {
    /// Advance after every element
    pub per_data: bool,
    /// Advance between microblocks
    pub per_block: bool,
}

impl AddressUpdate {
    /// Fixed address (peripheral data register)
    pub const FIXED: Self = Self {
        per_data: false,
        per_block: false,
    };

    /// Incrementing address (memory buffer)
    pub const INCREMENT: Self = Self {
        per_data: true,
        per_block: true,
    };
}

/// One descriptor of a scatter-gather chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DescriptorItem {
    /// Source bus address
    pub src: usize,
    /// Destination bus address
    pub dst: usize,
    /// Element width
    pub data_width: DataWidth,
    /// Elements per peripheral request
    pub chunk_size: ChunkSize,
    /// Element count of this item
    pub block_len: u32,
    /// Source address progression
    pub src_update: AddressUpdate,
    /// Destination address progression
    pub dst_update: AddressUpdate,
}

impl DescriptorItem {
    /// Bytes moved by this item
    #[inline]
    pub const fn byte_len(&self) -> usize {
        self.block_len as usize * self.data_width.bytes() as usize
    }
}

/// Per-mode DMA parameters: burst size, element width and the number of
/// bytes processed per engine request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferProfile {
    /// Elements per peripheral request
    pub chunk_size: ChunkSize,
    /// Element width
    pub data_width: DataWidth,
    /// Bytes per processing unit; buffer lengths must be multiples of it
    pub unit_bytes: usize,
}

impl TransferProfile {
    /// Create a profile
    pub const fn new(chunk_size: ChunkSize, data_width: DataWidth, unit_bytes: usize) -> Self {
        Self {
            chunk_size,
            data_width,
            unit_bytes,
        }
    }

    /// Check that `len` is a whole number of units
    #[inline]
    pub const fn is_aligned(&self, len: usize) -> bool {
        len % self.unit_bytes == 0
    }
}
