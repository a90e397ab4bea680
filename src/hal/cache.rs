//! Data cache maintenance

/// Data cache maintenance by address range.
///
/// Regions handed to the DMA controller must be cleaned before the
/// controller reads them, and invalidated after it wrote them and before
/// the CPU reads the result.
pub trait CacheMaintenance {
    /// Write back dirty lines covering `addr..addr + len` to the point of coherency.
    fn clean_region(&self, addr: usize, len: usize);

    /// Discard lines covering `addr..addr + len`.
    fn invalidate_region(&self, addr: usize, len: usize);
}

/// Cache maintenance for cache-less parts or non-cacheable buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CacheMaintenance for NoCache {
    #[inline(always)]
    fn clean_region(&self, _addr: usize, _len: usize) {}

    #[inline(always)]
    fn invalidate_region(&self, _addr: usize, _len: usize) {}
}

impl<C: CacheMaintenance + ?Sized> CacheMaintenance for &C {
    #[inline]
    fn clean_region(&self, addr: usize, len: usize) {
        (**self).clean_region(addr, len);
    }

    #[inline]
    fn invalidate_region(&self, addr: usize, len: usize) {
        (**self).invalidate_region(addr, len);
    }
}
