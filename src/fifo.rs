//! TIS FIFO transport shared by TPM 1.2 and TPM 2.0 parts that expose the
//! legacy FIFO interface. The two differ only in the command table they
//! encode with.

use alloc::vec;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, error};

use crate::codec::CommandSet;
use crate::config::{TimeoutKind, TpmConfig, TpmTimeout};
use crate::detect::TpmVersion;
use crate::error::{Result, TpmError};
use crate::locality::Locality;
use crate::port::{RegisterPort, Width};
use crate::print::print_response;
use crate::response::{Response, ResponseHeader};
use crate::transport::{FIFO_REGISTERS, Register, Transport};

pub mod constants;
pub mod fifo_core;
pub mod types;

use constants::*;
use fifo_core::{FifoRegs, burst_read, burst_write};
use types::{TpmRegAccess, TpmRegStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoTransport {
    version: TpmVersion,
    base: u64,
    timeout: TpmTimeout,
    max_response_size: usize,
}

impl FifoTransport {
    pub fn new(version: TpmVersion, config: &TpmConfig) -> Self {
        Self { version, base: config.base, timeout: config.timeout, max_response_size: config.max_response_size }
    }

    pub fn version(&self) -> TpmVersion {
        self.version
    }

    pub fn commands(&self) -> CommandSet {
        CommandSet::for_version(self.version)
    }

    /// Claim the locality if another one seized it. Returns whether
    /// REQUEST_USE was written.
    fn claim<P: RegisterPort>(&self, port: &P, regs: &FifoRegs) -> bool {
        let access = port.read(regs.access, Width::Dword);
        debug!("ACCESS: {:?}", TpmRegAccess(access));
        if access == ACCESS_BEEN_SEIZED {
            port.write(regs.access, Width::Dword, ACCESS_REQUEST_USE);
            debug!("locality seized, requested use");
            return true;
        }
        false
    }

    fn release<P: RegisterPort>(&self, port: &P, regs: &FifoRegs, requested_use: bool) {
        if requested_use {
            port.write(regs.access, Width::Dword, ACCESS_BEEN_SEIZED);
        }
        port.write(regs.access, Width::Byte, ACCESS_ACTIVE_LOCALITY);
        debug!("active locality relinquished");
    }

    fn wait_command_ready<P: RegisterPort>(&self, port: &P, regs: &FifoRegs) -> Result<()> {
        let bound = self.timeout.polls(TimeoutKind::CommandReady);
        for _ in 0..bound {
            if TpmRegStatus(port.read(regs.sts, Width::Byte)).command_ready() {
                debug!("TPM is command ready");
                return Ok(());
            }
            port.write(regs.sts, Width::Byte, STS_COMMAND_READY);
            core::hint::spin_loop();
        }
        error!("TPM is not command ready after {} polls", bound);
        Err(TpmError::DeviceTimeout(TimeoutKind::CommandReady))
    }

    fn wait_data_avail<P: RegisterPort>(&self, port: &P, regs: &FifoRegs) -> Result<()> {
        let bound = self.timeout.polls(TimeoutKind::DataAvailable);
        for _ in 0..bound {
            if TpmRegStatus(port.read(regs.sts, Width::Byte)).data_avail() {
                debug!("response data available");
                return Ok(());
            }
            port.write(regs.sts, Width::Byte, STS_DATA_AVAIL);
            core::hint::spin_loop();
        }
        error!("no response data after {} polls", bound);
        Err(TpmError::DeviceTimeout(TimeoutKind::DataAvailable))
    }
}

impl Transport for FifoTransport {
    fn command<P: RegisterPort>(&self, port: &P, name: &str, locality: Locality, argv: &[&str]) -> Result<Response> {
        let command = self.commands().encode(name, argv)?;
        debug!("{} at locality {}: opcode 0x{:x}", name, locality, command.opcode());

        let regs = FifoRegs::new(self.base, locality);
        let requested_use = self.claim(port, &regs);
        let result = self.send(port, locality, &command.bytes, command.size).and_then(|()| self.read(port, locality));
        self.release(port, &regs, requested_use);

        let response = result?;
        print_response(&response, self.version);
        Ok(response)
    }

    fn send<P: RegisterPort>(&self, port: &P, locality: Locality, bytes: &[u8], size: u32) -> Result<()> {
        let size = size as usize;
        if size > bytes.len() || bytes.len() < CMD_HEAD_SIZE || (size != 0 && size < CMD_HEAD_SIZE) {
            return Err(TpmError::InvalidArgument("command size"));
        }
        let regs = FifoRegs::new(self.base, locality);
        port.write(regs.access, Width::Byte, ACCESS_REQUEST_USE);
        self.wait_command_ready(port, &regs)?;

        if size == 0 {
            let mut patched = bytes.to_vec();
            let len = patched.len() as u32;
            BigEndian::write_u32(&mut patched[CMD_SIZE_OFFSET..CMD_CC_OFFSET], len);
            burst_write(port, &regs, &self.timeout, &patched)?;
        } else {
            burst_write(port, &regs, &self.timeout, &bytes[..size])?;
        }

        port.write(regs.sts, Width::Byte, STS_GO);
        debug!("TPM go");
        Ok(())
    }

    fn read<P: RegisterPort>(&self, port: &P, locality: Locality) -> Result<Response> {
        let regs = FifoRegs::new(self.base, locality);
        self.wait_data_avail(port, &regs)?;

        let mut head = [0u8; RSP_HEAD_SIZE];
        burst_read(port, &regs, &self.timeout, &mut head)?;
        let header = ResponseHeader::from_bytes(&head);
        debug!("response header: {:?}", header);
        // Only the bytes still to be streamed count against the limit.
        if RSP_HEAD_SIZE + header.payload_len() > self.max_response_size {
            error!("response size 0x{:x} over limit 0x{:x}", header.size, self.max_response_size);
            return Err(TpmError::ResponseTooLarge(header.size));
        }

        let mut payload = vec![0u8; header.payload_len()];
        burst_read(port, &regs, &self.timeout, &mut payload)?;
        Ok(Response { header, payload })
    }

    fn registers(&self) -> &'static [Register] {
        &FIFO_REGISTERS
    }
}
