//! SHT71 Sensor Driver for Embedded Rust
//!
//! This crate provides a driver for the Sensirion SHT71 (SHT1x/SHT7x family)
//! temperature and relative-humidity sensor. The sensor speaks a proprietary
//! two-wire protocol that is bit-banged in software over separate clock and
//! data lines, with a CRC-8 checksum on every exchange.
//!
//! # Features
//! - Blocking synchronous API; timing via the `embedded-hal` [`DelayNs`] trait
//! - GPIO access through the [`Gpio`] capability trait, with a Linux sysfs
//!   backend behind the `std` feature
//! - Designed for `no_std` environments
//! - Optional logging support via `defmt`
//!
//! # Wiring
//! The driver drives one clock line and one shared data line. Both line IDs
//! are supplied through [`Config`]; nothing else may touch those lines while
//! the driver is alive.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//! - `std`: Enables the `sysfs` GPIO backend
//!
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod convert;
pub mod crc;
pub mod error;
pub mod gpio;
pub mod protocol;
pub mod sht71;
#[cfg(any(test, feature = "std"))]
pub mod sysfs;

#[cfg(test)]
pub(crate) mod sim;

pub use crc::Crc8;
pub use error::Error;
pub use gpio::{Direction, Gpio, GpioLine, Level};
pub use protocol::{Command, Config, ProtocolEngine};
pub use sht71::{Measurement, Sht71};
