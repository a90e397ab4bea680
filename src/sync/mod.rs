//! Synchronization and Concurrency Support
//!
//! State in this crate is touched by exactly two parties: one foreground
//! context and the interrupt handlers of the engines it drives. This module
//! provides the primitives for that handoff:
//!
//! - [`BusyGate`] - try-lock-only exclusion (transfer in flight, bus transaction)
//! - [`ReadyFlag`] - "unit ready" flag raised by an ISR, consumed by a poll loop
//! - [`CriticalSectionCell`] - ISR-safe interior mutability for job and config state
//! - [`ClaimCell`] - try-claim exclusion for long-running driver calls, interrupts left enabled
//!
//! # Example
//!
//! ```ignore
//! use sam_xfer::sync::BusyGate;
//!
//! static GATE: BusyGate = BusyGate::new();
//!
//! if GATE.try_acquire() {
//!     // ... start the transfer; the completion path calls GATE.release()
//! }
//! ```

mod gate;
mod primitives;

pub use gate::BusyGate;
pub use primitives::{ClaimCell, CriticalSectionCell, ReadyFlag};
