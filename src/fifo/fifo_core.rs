use log::{debug, error};

use super::constants::*;
use super::types::TpmRegStatus;
use crate::config::{TimeoutKind, TpmTimeout};
use crate::error::{Result, TpmError};
use crate::locality::Locality;
use crate::port::{RegisterPort, Width};

/// Addresses of the FIFO registers of one locality bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoRegs {
    pub access: u64,
    pub sts: u64,
    pub data_fifo: u64,
}

impl FifoRegs {
    pub fn new(base: u64, locality: Locality) -> Self {
        Self {
            access: locality.register(base, TPM_ACCESS),
            sts: locality.register(base, TPM_STS),
            data_fifo: locality.register(base, TPM_DATA_FIFO),
        }
    }
}

/// Wait until STS reports a non-zero burst count and return it.
fn wait_burst<P: RegisterPort>(port: &P, regs: &FifoRegs, bound: u64, kind: TimeoutKind) -> Result<usize> {
    for _ in 0..bound {
        let burst = TpmRegStatus(port.read(regs.sts, Width::Dword)).burst();
        if burst != 0 {
            return Ok(burst);
        }
        core::hint::spin_loop();
    }
    error!("burst count stayed zero for {} polls", bound);
    Err(TpmError::DeviceTimeout(kind))
}

/// Stream `data` into DATA_FIFO, re-reading the burst count before every chunk.
pub fn burst_write<P: RegisterPort>(port: &P, regs: &FifoRegs, timeout: &TpmTimeout, data: &[u8]) -> Result<()> {
    let bound = timeout.polls(TimeoutKind::BurstWrite);
    let mut count = 0;
    while count < data.len() {
        let burst = wait_burst(port, regs, bound, TimeoutKind::BurstWrite)?;
        let chunk = burst.min(data.len() - count);
        for byte in &data[count..count + chunk] {
            port.write(regs.data_fifo, Width::Byte, *byte as u32);
        }
        count += chunk;
        debug!("burst write {} bytes ({}/{})", chunk, count, data.len());
    }
    Ok(())
}

/// Fill `buf` from DATA_FIFO, re-reading the burst count before every chunk.
pub fn burst_read<P: RegisterPort>(port: &P, regs: &FifoRegs, timeout: &TpmTimeout, buf: &mut [u8]) -> Result<()> {
    let bound = timeout.polls(TimeoutKind::BurstRead);
    let mut count = 0;
    while count < buf.len() {
        let burst = wait_burst(port, regs, bound, TimeoutKind::BurstRead)?;
        let chunk = burst.min(buf.len() - count);
        for byte in buf[count..count + chunk].iter_mut() {
            *byte = port.read(regs.data_fifo, Width::Byte) as u8;
        }
        count += chunk;
        debug!("burst read {} bytes ({}/{})", chunk, count, buf.len());
    }
    Ok(())
}
