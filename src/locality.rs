use core::fmt;
use core::str::FromStr;

use crate::error::TpmError;

pub const TPM_NR_LOCALITIES: u32 = 5;

/// One of the five 4KiB register banks of a TPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Locality {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Locality {
    pub const ALL: [Locality; TPM_NR_LOCALITIES as usize] =
        [Locality::Zero, Locality::One, Locality::Two, Locality::Three, Locality::Four];

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Offset of this locality's bank from the locality 0 base.
    pub fn offset(self) -> u64 {
        (self.index() as u64) << 12
    }

    /// Base address of this locality's bank.
    pub fn base(self, tpm_base: u64) -> u64 {
        tpm_base | self.offset()
    }

    /// Address of register `reg` inside this locality's bank.
    pub fn register(self, tpm_base: u64, reg: u32) -> u64 {
        self.base(tpm_base) | reg as u64
    }
}

impl TryFrom<u32> for Locality {
    type Error = TpmError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Locality::Zero),
            1 => Ok(Locality::One),
            2 => Ok(Locality::Two),
            3 => Ok(Locality::Three),
            4 => Ok(Locality::Four),
            _ => Err(TpmError::InvalidArgument("locality")),
        }
    }
}

impl FromStr for Locality {
    type Err = TpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Locality::Zero),
            "1" => Ok(Locality::One),
            "2" => Ok(Locality::Two),
            "3" => Ok(Locality::Three),
            "4" => Ok(Locality::Four),
            _ => Err(TpmError::InvalidArgument("locality")),
        }
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
