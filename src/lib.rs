//! Host-side TPM driver for the memory-mapped TIS/PTP register interface.
//!
//! Detects which TPM version and register interface the platform exposes,
//! binds the matching transport and command table, and drives the FIFO
//! locality/burst handshake to move commands and responses across the chip.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod codec;
pub mod config;
pub mod crb;
pub mod detect;
pub mod error;
pub mod fifo;
pub mod locality;
pub mod port;
pub mod print;
pub mod response;
pub mod tpm;
pub mod transport;

#[cfg(test)]
mod testing;

pub use codec::{Command, CommandSet};
pub use config::{TimeoutKind, TpmConfig, TpmTimeout};
pub use detect::{InterfaceKind, TpmVersion, detect};
pub use error::{Result, TpmError};
pub use locality::Locality;
pub use port::{AcpiTables, MmioPort, RegisterPort, Width};
pub use response::{Response, ResponseHeader};
pub use tpm::{DeviceBinding, Tpm};
pub use transport::{Register, Transport};
