//! Human-readable output, emitted through the `log` facade.

use core::fmt;

use log::{info, warn};

use crate::detect::TpmVersion;
use crate::response::Response;

const BYTES_PER_LINE: usize = 16;

/// One hex dump line: space separated bytes.
struct HexLine<'a>(&'a [u8]);

impl fmt::Display for HexLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Hex dump of `buf`, 16 bytes per line prefixed with the offset.
pub fn print_buffer(buf: &[u8]) {
    for (line, chunk) in buf.chunks(BYTES_PER_LINE).enumerate() {
        info!("{:04x}: {}", line * BYTES_PER_LINE, HexLine(chunk));
    }
}

/// The response report, its error text if any, then the payload.
pub fn print_response(response: &Response, version: TpmVersion) {
    let report = response.report(version);
    info!("{}", report);
    if let Some(error) = report.error() {
        warn!("TPM returned 0x{:x}: {}", response.header.return_code, error);
    }
    if !response.payload.is_empty() {
        info!("response payload ({} bytes):", response.payload.len());
        print_buffer(&response.payload);
    }
}
