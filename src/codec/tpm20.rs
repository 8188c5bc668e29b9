//! TPM 2.0 commands, see TPM 2.0 Library Part 3 Commands.
//!
//! The first argument of every command selects the session tag
//! (0: no sessions, 1: sessions).

use super::{Command, CommandSpec, TagRule, arg, lookup, number, number_u16};
use crate::error::Result;

pub const TPM2_CC_STARTUP: u32 = 0x0000_0144;
pub const TPM2_CC_SHUTDOWN: u32 = 0x0000_0145;
pub const TPM2_CC_SELF_TEST: u32 = 0x0000_0143;
pub const TPM2_CC_NV_READ: u32 = 0x0000_014E;
pub const TPM2_CC_NV_WRITE: u32 = 0x0000_0137;
pub const TPM2_CC_PCR_READ: u32 = 0x0000_017E;
pub const TPM2_CC_NV_DEFINE_SPACE: u32 = 0x0000_012A;
pub const TPM2_CC_NV_UNDEFINE_SPACE: u32 = 0x0000_0122;

pub const TPM_ST_NO_SESSIONS: u16 = 0x8001;
pub const TPM_ST_SESSIONS: u16 = 0x8002;

pub const TPM_RH_OWNER: u32 = 0x4000_0001;
pub const TPM_RH_PLATFORM: u32 = 0x4000_000C;

/* TPM_SU */
const TPM_SU: [(u32, u16); 2] = [
    (0, 0x0000), // TPM_SU_CLEAR
    (1, 0x0001), // TPM_SU_STATE
];

const TPMI_YES_NO: [(u32, u8); 2] = [(0, 0x00), (1, 0x01)];

const TPMI_RH_NV_AUTH: [(u32, u32); 2] = [(1, TPM_RH_PLATFORM), (2, TPM_RH_OWNER)];

const NO_SESSIONS: TagRule = TagRule::Required(TPM_ST_NO_SESSIONS);
const SESSIONS: TagRule = TagRule::Required(TPM_ST_SESSIONS);

pub static COMMANDS: [CommandSpec; 8] = [
    CommandSpec { name: "startup", opcode: TPM2_CC_STARTUP, size: 12, tag: NO_SESSIONS, encode: startup },
    CommandSpec { name: "shutdown", opcode: TPM2_CC_SHUTDOWN, size: 12, tag: TagRule::Caller, encode: shutdown },
    CommandSpec { name: "selftest", opcode: TPM2_CC_SELF_TEST, size: 11, tag: TagRule::Caller, encode: selftest },
    CommandSpec { name: "nvread", opcode: TPM2_CC_NV_READ, size: 0, tag: SESSIONS, encode: nv_access },
    CommandSpec { name: "nvwrite", opcode: TPM2_CC_NV_WRITE, size: 0, tag: SESSIONS, encode: nv_access },
    CommandSpec { name: "pcrread", opcode: TPM2_CC_PCR_READ, size: 14, tag: TagRule::Caller, encode: pcrread },
    CommandSpec {
        name: "nvdefinespace",
        opcode: TPM2_CC_NV_DEFINE_SPACE,
        size: 0,
        tag: SESSIONS,
        encode: nvdefinespace,
    },
    CommandSpec {
        name: "nvundefinespace",
        opcode: TPM2_CC_NV_UNDEFINE_SPACE,
        size: 0,
        tag: SESSIONS,
        encode: nvundefinespace,
    },
];

/// TPM2_Startup. 0: TPM_SU_CLEAR, 1: TPM_SU_STATE.
fn startup(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let startup_type = lookup(argv, 1, &TPM_SU, "startup")?;
    Ok(buf.append_u16(startup_type).finish())
}

/// TPM2_Shutdown. 0: TPM_SU_CLEAR, 1: TPM_SU_STATE.
fn shutdown(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let shutdown_type = lookup(argv, 1, &TPM_SU, "shutdown")?;
    Ok(buf.append_u16(shutdown_type).finish())
}

/// TPM2_SelfTest. 1: full test, 0: only untested functions.
fn selftest(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let full_test = lookup(argv, 1, &TPMI_YES_NO, "selftest")?;
    Ok(buf.append_u8(full_test).finish())
}

/// Shared layout of NV_Read and NV_Write: auth handle, index, size, offset.
fn nv_access(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let auth = lookup(argv, 1, &TPMI_RH_NV_AUTH, "NV auth")?;
    let index = number(arg(argv, 2, "NV index")?, "NV index")?;
    let size = number_u16(arg(argv, 3, "NV size")?, "NV size")?;
    let offset = number_u16(arg(argv, 4, "NV offset")?, "NV offset")?;
    Ok(buf.append_u32(auth).append_u32(index).append_u16(size).append_u16(offset).finish())
}

/// TPM2_PCR_Read with a raw 32-bit selection word.
fn pcrread(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let selection = number(arg(argv, 1, "PCR selection")?, "PCR selection")?;
    Ok(buf.append_u32(selection).finish())
}

/// TPM2_NV_DefineSpace: provision handle, auth, public info.
fn nvdefinespace(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let provision = lookup(argv, 1, &TPMI_RH_NV_AUTH, "NV provision")?;
    let auth = number(arg(argv, 2, "NV auth")?, "NV auth")?;
    let public_info = number(arg(argv, 3, "NV public info")?, "NV public info")?;
    Ok(buf.append_u32(provision).append_u32(auth).append_u32(public_info).finish())
}

/// TPM2_NV_UndefineSpace: provision handle, index.
fn nvundefinespace(spec: &CommandSpec, argv: &[&str]) -> Result<Command> {
    let buf = spec.header(argv)?;
    let provision = lookup(argv, 1, &TPMI_RH_NV_AUTH, "NV provision")?;
    let index = number(arg(argv, 2, "NV index")?, "NV index")?;
    Ok(buf.append_u32(provision).append_u32(index).finish())
}
