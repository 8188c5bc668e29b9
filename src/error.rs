use core::fmt;

use crate::config::TimeoutKind;
use crate::detect::{InterfaceKind, TpmVersion};

/// Errors surfaced by detection, binding and per-command operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TpmError {
    /// Neither the TCPA nor the TPM2 ACPI table is present.
    NoDeviceFound,
    /// The 2.0 interface id register held a value outside {0x0, 0x1, 0xF}.
    UnrecognizedInterface(u32),
    UnsupportedConfiguration { version: TpmVersion, interface: InterfaceKind },
    /// A command argument failed validation against its lookup table.
    InvalidArgument(&'static str),
    /// The bound transport has no working handshake.
    NotImplemented(&'static str),
    /// A polling loop exceeded its configured bound.
    DeviceTimeout(TimeoutKind),
    /// The response header declared more bytes than the configured maximum.
    ResponseTooLarge(u32),
}

impl TpmError {
    /// Startup-time errors abort the whole session; the rest only abort one command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TpmError::NoDeviceFound
                | TpmError::UnrecognizedInterface(_)
                | TpmError::UnsupportedConfiguration { .. }
        )
    }
}

impl fmt::Display for TpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TpmError::NoDeviceFound => write!(f, "no TPM recognized"),
            TpmError::UnrecognizedInterface(id) => {
                write!(f, "no TPM interface recognized (interface id 0x{:x})", id)
            }
            TpmError::UnsupportedConfiguration { version, interface } => write!(
                f,
                "invalid combination of TPM version {} and interface {}",
                version, interface
            ),
            TpmError::InvalidArgument(what) => write!(f, "invalid argument: {}", what),
            TpmError::NotImplemented(what) => write!(f, "{} is not implemented", what),
            TpmError::DeviceTimeout(kind) => write!(f, "timed out waiting for {}", kind),
            TpmError::ResponseTooLarge(size) => {
                write!(f, "response size 0x{:x} exceeds the response buffer", size)
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, TpmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_errors_are_fatal() {
        assert!(TpmError::NoDeviceFound.is_fatal());
        assert!(TpmError::UnrecognizedInterface(0x3).is_fatal());
        assert!(
            TpmError::UnsupportedConfiguration {
                version: TpmVersion::Tpm12,
                interface: InterfaceKind::Crb,
            }
            .is_fatal()
        );
    }

    #[test]
    fn command_errors_are_recoverable() {
        assert!(!TpmError::InvalidArgument("startup type").is_fatal());
        assert!(!TpmError::NotImplemented("CRB transport").is_fatal());
        assert!(!TpmError::DeviceTimeout(TimeoutKind::CommandReady).is_fatal());
        assert!(!TpmError::ResponseTooLarge(0x10000).is_fatal());
    }

    #[test]
    fn display_names_the_failure() {
        let msg = TpmError::UnrecognizedInterface(0x7).to_string();
        assert_eq!(msg, "no TPM interface recognized (interface id 0x7)");
        let msg = TpmError::DeviceTimeout(TimeoutKind::DataAvailable).to_string();
        assert_eq!(msg, "timed out waiting for data available");
    }
}
