use core::fmt;

use log::{debug, info};

use crate::crb::{TPM_INTERFACE_ID, TpmRegInterfaceId};
use crate::error::{Result, TpmError};
use crate::fifo::constants::TPM_LOCALITY_BASE;
use crate::port::{AcpiTables, RegisterPort, Width};

/// Interface identifier register of locality 0, read only on 2.0 parts.
pub const TPM20_INTERFACE_ADDR: u64 = TPM_LOCALITY_BASE | TPM_INTERFACE_ID as u64;

pub const TCPA_SIGNATURE: &[u8; 4] = b"TCPA";
pub const TPM2_SIGNATURE: &[u8; 4] = b"TPM2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TpmVersion {
    Tpm12,
    Tpm20,
}

impl fmt::Display for TpmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TpmVersion::Tpm12 => f.write_str("1.2"),
            TpmVersion::Tpm20 => f.write_str("2.0"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceKind {
    Crb,
    Fifo,
    FifoLegacy,
}

impl InterfaceKind {
    /// Map the low nibble of the interface id register.
    pub fn from_interface_id(id: u32) -> Result<Self> {
        match TpmRegInterfaceId(id).interface_type() {
            0x0 => Ok(InterfaceKind::Crb),
            0x1 => Ok(InterfaceKind::Fifo),
            0xF => Ok(InterfaceKind::FifoLegacy),
            other => Err(TpmError::UnrecognizedInterface(other)),
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceKind::Crb => f.write_str("crb"),
            InterfaceKind::Fifo => f.write_str("fifo"),
            InterfaceKind::FifoLegacy => f.write_str("fifo_legacy"),
        }
    }
}

/// Identify the TPM version from firmware tables and, on 2.0, its register interface.
pub fn detect<A, P>(acpi: &A, port: &P) -> Result<(TpmVersion, InterfaceKind)>
where
    A: AcpiTables + ?Sized,
    P: RegisterPort + ?Sized,
{
    let tpm12 = acpi.is_table_present(TCPA_SIGNATURE);
    let tpm20 = acpi.is_table_present(TPM2_SIGNATURE);

    let detected = match (tpm12, tpm20) {
        (false, false) => return Err(TpmError::NoDeviceFound),
        (true, false) => (TpmVersion::Tpm12, InterfaceKind::FifoLegacy),
        (_, true) => {
            let id = port.read(TPM20_INTERFACE_ADDR, Width::Dword);
            debug!("interface id: {:?}", TpmRegInterfaceId(id));
            (TpmVersion::Tpm20, InterfaceKind::from_interface_id(id)?)
        }
    };
    info!("TPM {} detected, {} interface", detected.0, detected.1);
    Ok(detected)
}
