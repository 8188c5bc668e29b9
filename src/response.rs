use alloc::vec::Vec;
use core::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::detect::TpmVersion;
use crate::fifo::constants::*;

mod status;

pub use status::tpm12_status;

pub const INVALID_RETURN_CODE: &str = "Invalid return code";

/// The fixed 10-byte header that opens every TPM response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub tag: u16,
    /// Size of the whole response, header included.
    pub size: u32,
    pub return_code: u32,
}

impl ResponseHeader {
    pub fn from_bytes(bytes: &[u8; RSP_HEAD_SIZE]) -> Self {
        Self {
            tag: BigEndian::read_u16(&bytes[0..RSP_SIZE_OFFSET]),
            size: BigEndian::read_u32(&bytes[RSP_SIZE_OFFSET..RSP_RST_OFFSET]),
            return_code: BigEndian::read_u32(&bytes[RSP_RST_OFFSET..RSP_HEAD_SIZE]),
        }
    }

    pub fn to_bytes(&self) -> [u8; RSP_HEAD_SIZE] {
        let mut bytes = [0u8; RSP_HEAD_SIZE];
        BigEndian::write_u16(&mut bytes[0..RSP_SIZE_OFFSET], self.tag);
        BigEndian::write_u32(&mut bytes[RSP_SIZE_OFFSET..RSP_RST_OFFSET], self.size);
        BigEndian::write_u32(&mut bytes[RSP_RST_OFFSET..RSP_HEAD_SIZE], self.return_code);
        bytes
    }

    pub fn is_success(&self) -> bool {
        self.return_code == 0
    }

    /// Bytes that follow the header. A failing return code suppresses the payload.
    pub fn payload_len(&self) -> usize {
        if self.size as usize > RSP_HEAD_SIZE && self.is_success() {
            self.size as usize - RSP_HEAD_SIZE
        } else {
            0
        }
    }

    /// Return code text. TPM 2.0 codes are only ever reported numerically.
    pub fn description(&self, version: TpmVersion) -> Option<&'static str> {
        match version {
            TpmVersion::Tpm12 => Some(tpm12_status(self.return_code).unwrap_or(INVALID_RETURN_CODE)),
            TpmVersion::Tpm20 => None,
        }
    }
}

/// A decoded response: header plus the payload blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub header: ResponseHeader,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn report(&self, version: TpmVersion) -> ResponseReport<'_> {
        ResponseReport { header: &self.header, version }
    }
}

/// Fixed textual rendering of a response header.
pub struct ResponseReport<'a> {
    header: &'a ResponseHeader,
    version: TpmVersion,
}

impl ResponseReport<'_> {
    /// Error text for a failing response, `None` when the command succeeded.
    pub fn error(&self) -> Option<&'static str> {
        if self.header.is_success() {
            return None;
        }
        self.header.description(self.version)
    }
}

impl fmt::Display for ResponseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------------------------------------------------------")?;
        writeln!(f, "                     TPM response header")?;
        writeln!(f, "----------------------------------------------------------------")?;
        writeln!(f, "   Response TAG: 0x{:x}", self.header.tag)?;
        writeln!(f, "   Data Size   : 0x{:x}", self.header.size)?;
        writeln!(f, "   Return Code : 0x{:x}", self.header.return_code)?;
        if let Some(desc) = self.header.description(self.version) {
            writeln!(f, "\t{}", desc)?;
        }
        Ok(())
    }
}
