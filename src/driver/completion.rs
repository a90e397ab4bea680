//! Transfer finalization
//!
//! Every accepted transfer ends in exactly one of these paths, each of which
//! releases the Busy Gate once.

#[cfg(feature = "log")]
use log::warn;

use super::job::{Callback, Region};
use crate::hal::cache::CacheMaintenance;
use crate::sync::BusyGate;

/// Run the callback, then open the gate.
#[inline]
pub fn finish(gate: &BusyGate, callback: Option<Callback>) {
    notify(callback);
    gate.release();
}

/// Run the callback without touching the gate (the gate was already
/// released by the interrupt side).
#[inline]
pub fn notify(callback: Option<Callback>) {
    if let Some(callback) = callback {
        callback.invoke();
    }
}

/// Interrupt-side DMA completion: make `output` visible to the CPU, then
/// open the gate.
///
/// Returns `false` if the gate was not held, meaning the transfer was
/// already finalized by another path.
pub fn invalidate_and_release<C>(cache: &C, gate: &BusyGate, output: Region) -> bool
where
    C: CacheMaintenance + ?Sized,
{
    cache.invalidate_region(output.addr, output.len);
    gate.release()
}

/// Failure path: open the gate without running the callback.
pub fn abort(gate: &BusyGate, reason: &'static str) {
    #[cfg(feature = "log")]
    warn!("transfer aborted: {reason}");
    #[cfg(feature = "defmt")]
    defmt::warn!("transfer aborted: {}", reason);
    #[cfg(not(any(feature = "log", feature = "defmt")))]
    let _ = reason;

    gate.release();
}
