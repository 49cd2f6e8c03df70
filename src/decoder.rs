use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::event::Line;
use crate::tables::{is_read, register_key, RegisterName};
use crate::timing::Timestamp;

/// Name lookup for one transceiver's command space.
pub trait CommandSet {
    /// Mode name of a 4-bit strobe opcode.
    fn strobe(&self, opcode: u8) -> Option<&'static str>;
    /// Register at `key` (address with the direction bit cleared).
    fn register(&self, key: u8) -> Option<RegisterName>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Strobe,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "S")]
    Strobe,
    #[serde(rename = "RD")]
    Read,
    #[serde(rename = "WR")]
    Write,
    #[serde(rename = "MOSI")]
    Mosi,
    #[serde(rename = "MISO")]
    Miso,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Strobe => "S",
            Direction::Read => "RD",
            Direction::Write => "WR",
            Direction::Mosi => "MOSI",
            Direction::Miso => "MISO",
        }
    }
}

impl From<Line> for Direction {
    fn from(line: Line) -> Self {
        match line {
            Line::Mosi => Direction::Mosi,
            Line::Miso => Direction::Miso,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted decode result. Never modified after it leaves the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub dir: Direction,
    pub label: String,
    #[serde(rename = "val", serialize_with = "hex_value")]
    pub value: u8,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Annotation {
    pub fn value_hex(&self) -> String {
        format!("0x{:X}", self.value)
    }
}

fn hex_value<S: Serializer>(v: &u8, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&format_args!("0x{v:X}"))
}

/// Possible reading of a transaction's nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    FourBitStrobe(u8),
    EightBitRegister(u8),
    EightBitStrobeArg { opcode: u8, arg_is_zero: bool },
}

/// A candidate that named something in the command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub dir: Direction,
    pub label: &'static str,
    pub value: u8,
}

/// Candidates for a closed transaction, highest precedence first.
///
/// Two nibbles are read as a register access before a strobe with
/// argument. Nibbles after the second do not take part.
///
/// Only bit 6 is cleared for the register lookup, so a strobe opcode
/// (0x8–0xF) as first nibble leaves bit 7 set. The A7137 register table has
/// no key at or above 0x40, so with it the strobe-with-argument reading is the
/// one that resolves for those opcodes.
pub fn candidates<C: CommandSet + ?Sized>(
    cmds: &C,
    count: usize,
    first: Option<u8>,
    second: Option<u8>,
) -> Vec<Candidate> {
    match (count, first, second) {
        (1, Some(nib), _) => vec![Candidate::FourBitStrobe(nib)],
        (n, Some(hi), Some(lo)) if n >= 2 => {
            let mut out = vec![Candidate::EightBitRegister((hi << 4) | lo)];
            if cmds.strobe(hi).is_some() {
                out.push(Candidate::EightBitStrobeArg {
                    opcode: hi,
                    arg_is_zero: lo == 0,
                });
            }
            out
        }
        _ => Vec::new(),
    }
}

impl Candidate {
    pub fn resolve<C: CommandSet + ?Sized>(self, cmds: &C) -> Option<Resolved> {
        match self {
            Candidate::FourBitStrobe(nib) => cmds.strobe(nib).map(|label| Resolved {
                dir: Direction::Strobe,
                label,
                value: nib,
            }),
            Candidate::EightBitRegister(addr) => {
                let read = is_read(addr);
                cmds.register(register_key(addr)).map(|name| Resolved {
                    dir: if read { Direction::Read } else { Direction::Write },
                    label: name.for_access(read),
                    value: addr,
                })
            }
            Candidate::EightBitStrobeArg { opcode, arg_is_zero } => {
                if !arg_is_zero {
                    return None;
                }
                cmds.strobe(opcode).map(|label| Resolved {
                    dir: Direction::Strobe,
                    label,
                    value: opcode << 4,
                })
            }
        }
    }
}

/// First candidate, in precedence order, that resolves to a name.
pub fn classify<C: CommandSet + ?Sized>(
    cmds: &C,
    count: usize,
    first: Option<u8>,
    second: Option<u8>,
) -> Option<Resolved> {
    candidates(cmds, count, first, second)
        .into_iter()
        .find_map(|c| c.resolve(cmds))
}
