//! TWI bus transaction layer
//!
//! Each bus carries two independent locks:
//!
//! - the **Busy Gate**, held for one transfer, and
//! - the **Transaction Lock**, held by a caller across several transfers so
//!   they reach the slave as one uninterrupted sequence.
//!
//! Transfers are only accepted inside a transaction.
//!
//! # Example
//!
//! ```ignore
//! use sam_xfer::twi::{BusId, TwiBusConfig, TwiBusRegistry};
//!
//! let buses = TwiBusRegistry::new([Twid::new(TWI0), Twid::new(TWI1)]);
//! let bus0 = BusId::new(0).unwrap();
//! buses.configure(bus0, TwiBusConfig::new().with_freq_hz(400_000))?;
//!
//! buses.start_transaction(bus0)?;
//! buses.transfer(bus0, 0x50, &mut [TwiBuffer::Write(&[0x00, 0x10])], None)?;
//! buses.wait_until_idle(bus0);
//! buses.transfer(bus0, 0x50, &mut [TwiBuffer::Read(&mut page)], None)?;
//! buses.wait_until_idle(bus0);
//! buses.stop_transaction(bus0)?;
//! ```

pub mod bus;
pub mod config;

pub use bus::{BusId, TwiBusRegistry};
pub use config::{AddressMode, TwiBusConfig};
