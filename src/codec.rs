//! Command encoding for the TPM 1.2 and 2.0 command tables.
//!
//! Every command is a fixed big-endian layout: the 10-byte command header
//! (tag, size, opcode) followed by the command's parameters. Arguments arrive
//! as text and are validated against per-command lookup tables before any
//! byte is produced.

use alloc::vec::Vec;

use byteorder::{BigEndian, ByteOrder};
use log::warn;

use crate::detect::TpmVersion;
use crate::error::{Result, TpmError};
use crate::fifo::constants::*;

pub mod tpm12;
pub mod tpm20;

/// Session selector argument of the 2.0 commands.
const SESSION_TAGS: [(u32, u16); 2] = [(0, tpm20::TPM_ST_NO_SESSIONS), (1, tpm20::TPM_ST_SESSIONS)];

/// An encoded command ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub bytes: Vec<u8>,
    /// Size carried in the header. 0 means the transport fills in the serialized length.
    pub size: u32,
}

impl Command {
    pub fn tag(&self) -> u16 {
        BigEndian::read_u16(&self.bytes[0..CMD_SIZE_OFFSET])
    }

    pub fn opcode(&self) -> u32 {
        BigEndian::read_u32(&self.bytes[CMD_CC_OFFSET..CMD_HEAD_SIZE])
    }
}

/// How a command's header tag is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// Not caller selectable.
    Fixed(u16),
    /// Caller passes a session selector that must resolve to this tag.
    Required(u16),
    /// Caller passes any valid session selector.
    Caller,
}

/// Static description of one command of a version's table.
pub struct CommandSpec {
    pub name: &'static str,
    pub opcode: u32,
    /// Declared header size, 0 when computed at send time.
    pub size: u32,
    pub tag: TagRule,
    encode: fn(&CommandSpec, &[&str]) -> Result<Command>,
}

impl CommandSpec {
    /// Start the command buffer: resolve the tag from the session selector
    /// in argument 0 when the tag rule takes one, then write the header.
    pub(crate) fn header(&self, argv: &[&str]) -> Result<CommandBuf> {
        let tag = match self.tag {
            TagRule::Fixed(tag) => tag,
            TagRule::Required(required) => {
                let tag = lookup(argv, 0, &SESSION_TAGS, "session")?;
                if tag != required {
                    return Err(TpmError::InvalidArgument("session"));
                }
                tag
            }
            TagRule::Caller => lookup(argv, 0, &SESSION_TAGS, "session")?,
        };
        Ok(CommandBuf::new(tag, self.size, self.opcode))
    }
}

/// The command table of one TPM version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSet {
    Tpm12,
    Tpm20,
}

impl CommandSet {
    pub fn for_version(version: TpmVersion) -> Self {
        match version {
            TpmVersion::Tpm12 => CommandSet::Tpm12,
            TpmVersion::Tpm20 => CommandSet::Tpm20,
        }
    }

    pub fn specs(&self) -> &'static [CommandSpec] {
        match self {
            CommandSet::Tpm12 => &tpm12::COMMANDS,
            CommandSet::Tpm20 => &tpm20::COMMANDS,
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&'static CommandSpec> {
        self.specs().iter().find(|spec| spec.name == name).ok_or(TpmError::InvalidArgument("command name"))
    }

    /// Encode `name` with its textual arguments.
    pub fn encode(&self, name: &str, argv: &[&str]) -> Result<Command> {
        let result = self.lookup(name).and_then(|spec| (spec.encode)(spec, argv));
        if let Err(TpmError::InvalidArgument(what)) = &result {
            warn!("{}: invalid {} value", name, what);
        }
        result
    }
}

/// Big-endian command buffer under construction.
pub(crate) struct CommandBuf {
    buf: Vec<u8>,
    size: u32,
}

impl CommandBuf {
    pub(crate) fn new(tag: u16, size: u32, opcode: u32) -> Self {
        let mut buf = Vec::with_capacity(CMD_HEAD_SIZE.max(size as usize));
        buf.extend_from_slice(&tag.to_be_bytes());
        buf.extend_from_slice(&size.to_be_bytes());
        buf.extend_from_slice(&opcode.to_be_bytes());
        Self { buf, size }
    }

    pub(crate) fn append_u8(mut self, data: u8) -> Self {
        self.buf.push(data);
        self
    }

    pub(crate) fn append_u16(mut self, data: u16) -> Self {
        self.buf.extend_from_slice(&data.to_be_bytes());
        self
    }

    pub(crate) fn append_u32(mut self, data: u32) -> Self {
        self.buf.extend_from_slice(&data.to_be_bytes());
        self
    }

    pub(crate) fn finish(self) -> Command {
        Command { bytes: self.buf, size: self.size }
    }
}

pub(crate) fn arg<'a>(argv: &[&'a str], index: usize, what: &'static str) -> Result<&'a str> {
    argv.get(index).copied().ok_or(TpmError::InvalidArgument(what))
}

/// Decimal or `0x`-prefixed hexadecimal.
pub(crate) fn number(text: &str, what: &'static str) -> Result<u32> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.map_err(|_| TpmError::InvalidArgument(what))
}

pub(crate) fn number_u16(text: &str, what: &'static str) -> Result<u16> {
    u16::try_from(number(text, what)?).map_err(|_| TpmError::InvalidArgument(what))
}

/// Resolve argument `index` through an enumerated table.
pub(crate) fn lookup<T: Copy>(argv: &[&str], index: usize, table: &[(u32, T)], what: &'static str) -> Result<T> {
    let key = number(arg(argv, index, what)?, what)?;
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v).ok_or(TpmError::InvalidArgument(what))
}
