//! CRB slot of the dispatch table.
//!
//! TPM 2.0 parts may expose the Command Response Buffer interface instead of
//! a FIFO. Only its interface id register is used here, to tell the
//! interfaces apart; commands over CRB are not implemented.

use bitfield::bitfield;
use log::warn;

use crate::error::{Result, TpmError};
use crate::locality::Locality;
use crate::port::RegisterPort;
use crate::response::Response;
use crate::transport::{Register, Transport};

//-----------------------------------------------------------------------------
// CRB I/F related definitions, see TCG PC Client Platform TPM Profile (PTP) Specification, Level 00 Revision 00.43
//-----------------------------------------------------------------------------
pub const TPM_INTERFACE_ID: u32 = 0x30;

bitfield! {
    pub struct TpmRegInterfaceId(u32);
    impl Debug;
    u32;
    pub interface_type, _: 3, 0;
    pub interface_version, _: 7, 4;
    pub cap_locality, _: 8;
    pub cap_fifo, _: 13;
    pub cap_crb, _: 14;
    pub rid, _: 31, 24;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrbTransport;

impl CrbTransport {
    const NAME: &'static str = "CRB transport";
}

impl Transport for CrbTransport {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_id_fields() {
        let id = TpmRegInterfaceId(0x0100_4010);
        assert_eq!(id.interface_type(), 0x0);
        assert_eq!(id.interface_version(), 0x1);
        assert!(id.cap_crb());
        assert!(!id.cap_fifo());
        assert_eq!(id.rid(), 0x01);
    }

    #[test]
    fn crb_has_no_register_bank() {
        assert!(CrbTransport.registers().is_empty());
    }
}
