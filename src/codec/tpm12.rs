//! TPM 1.2 commands, see TPM Main Part 3 Commands.

use super::{Command, CommandSpec, TagRule, arg, lookup, number};
use crate::error::{Result, TpmError};

pub const TPM_TAG_RQU_COMMAND: u16 = 0x00C1;
pub const TPM_TAG_RSP_COMMAND: u16 = 0x00C4;

pub const TPM_ORD_CONTINUESELFTEST: u32 = 0x0000_0053;
pub const TPM_ORD_FORCECLEAR: u32 = 0x0000_005D;
pub const TPM_ORD_NV_READVALUE: u32 = 0x0000_00CF;
pub const TPM_ORD_PCRREAD: u32 = 0x0000_0015;
pub const TPM_ORD_STARTUP: u32 = 0x0000_0099;

/* TPM_STARTUP_TYPE */
const STARTUP: [(u32, u16); 3] = [
    (1, 0x0001), // TPM_ST_CLEAR
    (2, 0x0002), // TPM_ST_STATE
    (3, 0x0003), // TPM_ST_DEACTIVATED
];

pub const TPM_NUM_PCR: u32 = 31;

const RQU: TagRule = TagRule::Fixed(TPM_TAG_RQU_COMMAND);

pub static COMMANDS: [CommandSpec; 5] = [
    CommandSpec { name: "pcrread", opcode: TPM_ORD_PCRREAD, size: 14, tag: RQU, encode: pcrread },
    CommandSpec { name: "nvread", opcode: TPM_ORD_NV_READVALUE, size: 22, tag: RQU, encode: nvread },
    CommandSpec { name: "startup", opcode: TPM_ORD_STARTUP, size: 12, tag: RQU, encode: startup },
    CommandSpec { name: "continueselftest", opcode: TPM_ORD_CONTINUESELFTEST, size: 10, tag: RQU, encode: header_only },
    CommandSpec { name: "forceclear", opcode: TPM_ORD_FORCECLEAR, size: 10, tag: RQU, encode: header_only },
];

/// TPM_PCRRead: report the contents of one PCR.
fn pcrread(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let pcr = number(arg(argv, 0, "PCR")?, "PCR")?;
    if pcr >= TPM_NUM_PCR {
        return Err(TpmError::InvalidArgument("PCR"));
    }
    Ok(spec.header(argv)?.append_u32(pcr).finish())
}

/// TPM_NV_ReadValue: index, offset, size.
fn nvread(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let index = number(arg(argv, 0, "NV index")?, "NV index")?;
    let offset = number(arg(argv, 1, "NV offset")?, "NV offset")?;
    let size = number(arg(argv, 2, "NV size")?, "NV size")?;
    Ok(spec.header(argv)?.append_u32(index).append_u32(offset).append_u32(size).finish())
}

/// TPM_Startup. Type 1: clear, 2: state, 3: deactivated.
fn startup(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let startup_type = lookup(argv, 0, &STARTUP, "startup")?;
    Ok(spec.header(argv)?.append_u16(startup_type).finish())
}

/// TPM_ContinueSelfTest and TPM_ForceClear carry no parameters.
fn header_only(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    Ok(spec.header(argv)?.finish())
}
