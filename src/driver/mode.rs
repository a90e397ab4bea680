//! Mode policy: (chaining mode, CFB size) to DMA transfer profile
//!
//! Every mode moves 16-byte blocks with 4-word bursts except the narrow CFB
//! variants, which feed the engine one element per request.

use crate::constants::AES_BLOCK_SIZE;
use crate::dma::{ChunkSize, DataWidth, TransferProfile};

use super::config::{AesMode, CfbSize};

/// Profile for all block-wide modes
pub const BLOCK_PROFILE: TransferProfile = TransferProfile::new(ChunkSize::Chunk4, DataWidth::Word, AES_BLOCK_SIZE);

/// Narrow CFB profiles indexed by [`CfbSize`] discriminant
const CFB_PROFILES: [TransferProfile; 5] = [
    // CFB-128
    BLOCK_PROFILE,
    // CFB-64
    TransferProfile::new(ChunkSize::Chunk1, DataWidth::Word, 4),
    // CFB-32
    TransferProfile::new(ChunkSize::Chunk1, DataWidth::Word, 4),
    // CFB-16
    TransferProfile::new(ChunkSize::Chunk1, DataWidth::HalfWord, 2),
    // CFB-8
    TransferProfile::new(ChunkSize::Chunk1, DataWidth::Byte, 1),
];

/// Resolve the transfer profile of `mode`; `cfb_size` only matters in CFB mode
#[must_use]
pub const fn profile_for(mode: AesMode, cfb_size: CfbSize) -> TransferProfile {
    match mode {
        AesMode::Cfb => CFB_PROFILES[cfb_size as usize],
        _ => BLOCK_PROFILE,
    }
}
