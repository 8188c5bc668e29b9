//! Simulated TIS FIFO and ACPI doubles for unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use crate::fifo::constants::*;
use crate::port::{AcpiTables, RegisterPort, Width};

/// Where the simulated device stops cooperating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    NeverReady,
    StallWrite,
    NeverDataAvail,
    StallHeader,
    StallPayload,
}

#[derive(Default)]
struct SimState {
    access: u32,
    bursts: Vec<u32>,
    burst_pos: usize,
    ready_after: u32,
    ready_requests: u32,
    go: bool,
    response: VecDeque<u8>,
    written: Vec<u8>,
    fifo_reads: usize,
    writes: Vec<(u64, Width, u32)>,
    registers: BTreeMap<u32, u32>,
    fault: Option<Fault>,
}

pub struct SimTpm {
    state: RefCell<SimState>,
}

impl SimTpm {
    pub fn new() -> Self {
        let state = SimState { access: 0xA1, bursts: vec![0x40], ..Default::default() };
        Self { state: RefCell::new(state) }
    }

    pub fn with_access(self, access: u32) -> Self {
        self.state.borrow_mut().access = access;
        self
    }

    /// Burst counts returned by successive 32-bit STS reads, cycled.
    pub fn with_bursts(self, bursts: &[u32]) -> Self {
        self.state.borrow_mut().bursts = bursts.to_vec();
        self
    }

    /// Number of COMMAND_READY writes before STS reports ready.
    pub fn with_ready_after(self, writes: u32) -> Self {
        self.state.borrow_mut().ready_after = writes;
        self
    }

    pub fn with_response(self, bytes: &[u8]) -> Self {
        self.state.borrow_mut().response = bytes.iter().copied().collect();
        self
    }

    /// A well-formed response: header sized to cover `payload`.
    pub fn responding(self, tag: u16, code: u32, payload: &[u8]) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&tag.to_be_bytes());
        bytes.extend_from_slice(&((RSP_HEAD_SIZE + payload.len()) as u32).to_be_bytes());
        bytes.extend_from_slice(&code.to_be_bytes());
        bytes.extend_from_slice(payload);
        self.with_response(&bytes)
    }

    pub fn with_register(self, offset: u32, value: u32) -> Self {
        self.state.borrow_mut().registers.insert(offset, value);
        self
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        self.state.borrow_mut().fault = Some(fault);
        self
    }

    pub fn fifo_written(&self) -> Vec<u8> {
        self.state.borrow().written.clone()
    }

    pub fn fifo_reads(&self) -> usize {
        self.state.borrow().fifo_reads
    }

    /// Every write to register `offset`, in order, with its bank base.
    pub fn writes_to(&self, offset: u32) -> Vec<(u64, Width, u32)> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(address, _, _)| (address & 0xFFF) as u32 == offset)
            .copied()
            .collect()
    }

    /// Byte-wide ACTIVE_LOCALITY writes to ACCESS.
    pub fn releases(&self) -> usize {
        self.writes_to(TPM_ACCESS)
            .iter()
            .filter(|(_, width, value)| *width == Width::Byte && *value == ACCESS_ACTIVE_LOCALITY)
            .count()
    }

    pub fn go_written(&self) -> bool {
        self.state.borrow().go
    }

    fn next_burst(state: &mut SimState) -> u32 {
        let stalled = match state.fault {
            Some(Fault::StallWrite) => !state.go,
            Some(Fault::StallHeader) => state.go,
            Some(Fault::StallPayload) => state.go && state.fifo_reads >= RSP_HEAD_SIZE,
            _ => false,
        };
        if stalled || state.bursts.is_empty() {
            return 0;
        }
        let burst = state.bursts[state.burst_pos % state.bursts.len()];
        state.burst_pos += 1;
        burst
    }

    fn ready(state: &SimState) -> bool {
        state.fault != Some(Fault::NeverReady) && state.ready_requests >= state.ready_after
    }
}

impl RegisterPort for SimTpm {
    fn read(&self, address: u64, width: Width) -> u32 {
        let mut state = self.state.borrow_mut();
        match (address & 0xFFF) as u32 {
            TPM_ACCESS => state.access,
            TPM_STS => {
                let mut sts = 0x80;
                if Self::ready(&state) {
                    sts |= STS_COMMAND_READY;
                }
                if state.go && state.fault != Some(Fault::NeverDataAvail) {
                    sts |= STS_DATA_AVAIL;
                }
                match width {
                    Width::Byte => sts,
                    Width::Dword => sts | (Self::next_burst(&mut state) << STS_BURST_COUNT_SHIFT),
                }
            }
            TPM_DATA_FIFO => {
                state.fifo_reads += 1;
                state.response.pop_front().unwrap_or(0xFF) as u32
            }
            offset => state.registers.get(&offset).copied().unwrap_or(0),
        }
    }

    fn write(&self, address: u64, width: Width, value: u32) {
        let mut state = self.state.borrow_mut();
        state.writes.push((address, width, value));
        match (address & 0xFFF) as u32 {
            TPM_STS if value == STS_COMMAND_READY => state.ready_requests += 1,
            TPM_STS if value == STS_GO => state.go = true,
            TPM_DATA_FIFO => state.written.push(value as u8),
            _ => {}
        }
    }
}

/// ACPI double with fixed table presence.
pub struct SimAcpi {
    pub tcpa: bool,
    pub tpm2: bool,
}

impl AcpiTables for SimAcpi {
    fn is_table_present(&self, signature: &[u8; 4]) -> bool {
        match signature {
            b"TCPA" => self.tcpa,
            b"TPM2" => self.tpm2,
            _ => false,
        }
    }
}
