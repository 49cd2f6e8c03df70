use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::timing::Timestamp;

/// SPI data line a sample was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Line {
    Mosi,
    Miso,
}

impl Line {
    pub fn label(self) -> &'static str {
        match self {
            Line::Mosi => "MOSI",
            Line::Miso => "MISO",
        }
    }
}

/// Which data line(s) feed the nibble stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    #[default]
    Mosi,
    Miso,
    Both,
}

impl Source {
    pub fn lines(self) -> &'static [Line] {
        match self {
            Source::Mosi => &[Line::Mosi],
            Source::Miso => &[Line::Miso],
            Source::Both => &[Line::Mosi, Line::Miso],
        }
    }
}

impl FromStr for Source {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mosi" => Ok(Source::Mosi),
            "miso" => Ok(Source::Miso),
            "both" => Ok(Source::Both),
            _ => Err(SettingsError::InvalidChoice {
                key: "source".into(),
                value: s.into(),
            }),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Mosi => "MOSI",
            Source::Miso => "MISO",
            Source::Both => "Both",
        })
    }
}

/// One sampled SPI word, with whatever each data line carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFrame {
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mosi: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miso: Option<Vec<u8>>,
}

impl DataFrame {
    pub fn samples(&self, line: Line) -> &[u8] {
        let buf = match line {
            Line::Mosi => &self.mosi,
            Line::Miso => &self.miso,
        };
        buf.as_deref().unwrap_or(&[])
    }

    /// Nibbles selected by `source`, in processing order (MOSI before MISO).
    pub fn nibbles(&self, source: Source) -> impl Iterator<Item = (Line, u8)> + '_ {
        source
            .lines()
            .iter()
            .flat_map(move |&line| self.samples(line).iter().map(move |&v| (line, v & 0xF)))
    }
}

/// Chip-select framed bus activity, in capture order.
///
/// Externally tagged in JSON (`{"open": {"at": 0}}`) so timestamps above
/// `u64::MAX` survive deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusEvent {
    /// Chip select asserted.
    Open { at: Timestamp },
    Data(DataFrame),
    /// Chip select released.
    Close { start: Timestamp, end: Timestamp },
}

impl BusEvent {
    pub fn open(at: u64) -> Self {
        BusEvent::Open { at: Timestamp::from(at) }
    }

    pub fn close(start: u64, end: u64) -> Self {
        BusEvent::Close {
            start: Timestamp::from(start),
            end: Timestamp::from(end),
        }
    }

    /// Data event with `nibbles` on MOSI and nothing on MISO.
    pub fn mosi(start: u64, end: u64, nibbles: &[u8]) -> Self {
        BusEvent::Data(DataFrame {
            start: Timestamp::from(start),
            end: Timestamp::from(end),
            mosi: Some(nibbles.to_vec()),
            miso: None,
        })
    }

    pub fn miso(start: u64, end: u64, nibbles: &[u8]) -> Self {
        BusEvent::Data(DataFrame {
            start: Timestamp::from(start),
            end: Timestamp::from(end),
            mosi: None,
            miso: Some(nibbles.to_vec()),
        })
    }
}
