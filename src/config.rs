use core::fmt;

use crate::fifo::constants::*;

/*
 * The term timeout applies to timings between various states
 * or transitions within the interface protocol.
 */
pub const TIMEOUT_UNIT: u64 = 0x100000 / 330; /* ~1ms, 1 tpm r/w need > 330ns */
pub const TIMEOUT_A: u64 = 750; /* 750ms */
pub const TIMEOUT_B: u64 = 2000; /* 2s */
pub const TIMEOUT_C: u64 = 75000; /* 75s */
pub const TIMEOUT_D: u64 = 750; /* 750ms */

pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 0x1000;

/// The bounded polling loops of the FIFO handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    CommandReady,
    DataAvailable,
    BurstWrite,
    BurstRead,
}

impl fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeoutKind::CommandReady => "command ready",
            TimeoutKind::DataAvailable => "data available",
            TimeoutKind::BurstWrite => "write burst count",
            TimeoutKind::BurstRead => "read burst count",
        };
        f.write_str(name)
    }
}

/// TIS timeouts in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TpmTimeout {
    pub timeout_a: u64,
    pub timeout_b: u64,
    pub timeout_c: u64,
    pub timeout_d: u64,
}

impl Default for TpmTimeout {
    fn default() -> Self {
        Self { timeout_a: TIMEOUT_A, timeout_b: TIMEOUT_B, timeout_c: TIMEOUT_C, timeout_d: TIMEOUT_D }
    }
}

impl TpmTimeout {
    /// Every timeout set to `ms`; handy for simulated devices.
    pub const fn uniform(ms: u64) -> Self {
        Self { timeout_a: ms, timeout_b: ms, timeout_c: ms, timeout_d: ms }
    }

    /// Upper bound on register polls for one loop of the given kind.
    pub fn polls(&self, kind: TimeoutKind) -> u64 {
        let ms = match kind {
            TimeoutKind::CommandReady => self.timeout_b,
            TimeoutKind::DataAvailable => self.timeout_c,
            TimeoutKind::BurstWrite => self.timeout_d,
            TimeoutKind::BurstRead => self.timeout_d,
        };
        TIMEOUT_UNIT.saturating_mul(ms).max(1)
    }
}

/// Platform-supplied driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TpmConfig {
    /// Physical address of the locality 0 register bank.
    pub base: u64,
    pub timeout: TpmTimeout,
    /// Largest DataSize accepted from a response header.
    pub max_response_size: usize,
}

impl Default for TpmConfig {
    fn default() -> Self {
        Self { base: TPM_LOCALITY_BASE, timeout: TpmTimeout::default(), max_response_size: DEFAULT_MAX_RESPONSE_SIZE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_tis_base() {
        let config = TpmConfig::default();
        assert_eq!(config.base, 0xFED4_0000);
        assert_eq!(config.timeout.timeout_b, 2000);
        assert_eq!(config.max_response_size, 4096);
    }

    #[test]
    fn polls_scale_with_timeout_unit() {
        let timeout = TpmTimeout::default();
        assert_eq!(timeout.polls(TimeoutKind::CommandReady), TIMEOUT_UNIT * TIMEOUT_B);
        assert_eq!(timeout.polls(TimeoutKind::DataAvailable), TIMEOUT_UNIT * TIMEOUT_C);
        assert_eq!(timeout.polls(TimeoutKind::BurstRead), TIMEOUT_UNIT * TIMEOUT_D);
    }

    #[test]
    fn zero_timeout_still_polls_once() {
        assert_eq!(TpmTimeout::uniform(0).polls(TimeoutKind::BurstWrite), 1);
    }
}
