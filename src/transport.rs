//! The uniform command/send/read surface every register interface exposes,
//! and the fixed (version, interface) table that picks one.

use core::fmt;

use log::warn;

use crate::config::TpmConfig;
use crate::crb::CrbTransport;
use crate::detect::{InterfaceKind, TpmVersion};
use crate::error::{Result, TpmError};
use crate::fifo::FifoTransport;
use crate::fifo::constants::*;
use crate::locality::Locality;
use crate::port::RegisterPort;
use crate::response::Response;

/// Named registers of a transport's register bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Access,
    Sts,
    DataFifo,
    DidVid,
    Rid,
    IntfCapability,
    IntEnable,
}

impl Register {
    pub fn name(self) -> &'static str {
        match self {
            Register::Access => "TPM_ACCESS",
            Register::Sts => "TPM_STS",
            Register::DataFifo => "TPM_DATA_FIFO",
            Register::DidVid => "TPM_DID_VID",
            Register::Rid => "TPM_RID",
            Register::IntfCapability => "TPM_INTF_CAPABILITY",
            Register::IntEnable => "TPM_INT_ENABLE",
        }
    }

    /// Offset inside a locality bank.
    pub fn offset(self) -> u32 {
        match self {
            Register::Access => TPM_ACCESS,
            Register::Sts => TPM_STS,
            Register::DataFifo => TPM_DATA_FIFO,
            Register::DidVid => TPM_DID_VID,
            Register::Rid => TPM_RID,
            Register::IntfCapability => TPM_INTF_CAPABILITY,
            Register::IntEnable => TPM_INT_ENABLE,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dump order of the legacy FIFO bank. DATA_FIFO is left out, reading it
/// consumes response bytes.
pub const FIFO_REGISTERS: [Register; 6] = [
    Register::Access,
    Register::Sts,
    Register::DidVid,
    Register::Rid,
    Register::IntfCapability,
    Register::IntEnable,
];

/// One register interface of a TPM.
///
/// `send` and `read` are the two halves of the handshake. Only `command`
/// checks for a seized locality and relinquishes it afterwards.
pub trait Transport {
    fn command<P: RegisterPort>(&self, port: &P, name: &str, locality: Locality, argv: &[&str]) -> Result<Response>;

    fn send<P: RegisterPort>(&self, port: &P, locality: Locality, bytes: &[u8], size: u32) -> Result<()>;

    fn read<P: RegisterPort>(&self, port: &P, locality: Locality) -> Result<Response>;

    fn registers(&self) -> &'static [Register];
}

/// FIFO interface of the TPM 2.0 PTP. Detected and bound, but without a
/// handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tpm20FifoTransport;

impl Tpm20FifoTransport {
    const NAME: &'static str = "TPM 2.0 FIFO transport";
}

impl Transport for Tpm20FifoTransport {
    fn command<P: RegisterPort>(&self, _port: &P, name: &str, _locality: Locality, _argv: &[&str]) -> Result<Response> {
        warn!("{}: {} is not implemented", name, Self::NAME);
        Err(TpmError::NotImplemented(Self::NAME))
    }

    fn send<P: RegisterPort>(&self, _port: &P, _locality: Locality, _bytes: &[u8], _size: u32) -> Result<()> {
        Err(TpmError::NotImplemented(Self::NAME))
    }

    fn read<P: RegisterPort>(&self, _port: &P, _locality: Locality) -> Result<Response> {
        Err(TpmError::NotImplemented(Self::NAME))
    }

    fn registers(&self) -> &'static [Register] {
        &[]
    }
}

/// The transport bound to a detected (version, interface) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Tpm12Fifo(FifoTransport),
    Tpm20Crb(CrbTransport),
    Tpm20Fifo(Tpm20FifoTransport),
    /// Same handshake as `Tpm12Fifo`, 2.0 command table.
    Tpm20FifoLegacy(FifoTransport),
}

impl Driver {
    pub fn select(version: TpmVersion, interface: InterfaceKind, config: &TpmConfig) -> Result<Self> {
        match (version, interface) {
            (TpmVersion::Tpm12, InterfaceKind::FifoLegacy) => {
                Ok(Driver::Tpm12Fifo(FifoTransport::new(TpmVersion::Tpm12, config)))
            }
            (TpmVersion::Tpm20, InterfaceKind::Crb) => Ok(Driver::Tpm20Crb(CrbTransport)),
            (TpmVersion::Tpm20, InterfaceKind::Fifo) => Ok(Driver::Tpm20Fifo(Tpm20FifoTransport)),
            (TpmVersion::Tpm20, InterfaceKind::FifoLegacy) => {
                Ok(Driver::Tpm20FifoLegacy(FifoTransport::new(TpmVersion::Tpm20, config)))
            }
            (version, interface) => Err(TpmError::UnsupportedConfiguration { version, interface }),
        }
    }
}

impl Transport for Driver {
    fn command<P: RegisterPort>(&self, port: &P, name: &str, locality: Locality, argv: &[&str]) -> Result<Response> {
        match self {
            Driver::Tpm12Fifo(fifo) | Driver::Tpm20FifoLegacy(fifo) => fifo.command(port, name, locality, argv),
            Driver::Tpm20Crb(crb) => crb.command(port, name, locality, argv),
            Driver::Tpm20Fifo(fifo) => fifo.command(port, name, locality, argv),
        }
    }

    fn send<P: RegisterPort>(&self, port: &P, locality: Locality, bytes: &[u8], size: u32) -> Result<()> {
        match self {
            Driver::Tpm12Fifo(fifo) | Driver::Tpm20FifoLegacy(fifo) => fifo.send(port, locality, bytes, size),
            Driver::Tpm20Crb(crb) => crb.send(port, locality, bytes, size),
            Driver::Tpm20Fifo(fifo) => fifo.send(port, locality, bytes, size),
        }
    }

    fn read<P: RegisterPort>(&self, port: &P, locality: Locality) -> Result<Response> {
        match self {
            Driver::Tpm12Fifo(fifo) | Driver::Tpm20FifoLegacy(fifo) => fifo.read(port, locality),
            Driver::Tpm20Crb(crb) => crb.read(port, locality),
            Driver::Tpm20Fifo(fifo) => fifo.read(port, locality),
        }
    }

    fn registers(&self) -> &'static [Register] {
        match self {
            Driver::Tpm12Fifo(fifo) | Driver::Tpm20FifoLegacy(fifo) => fifo.registers(),
            Driver::Tpm20Crb(crb) => crb.registers(),
            Driver::Tpm20Fifo(fifo) => fifo.registers(),
        }
    }
}
