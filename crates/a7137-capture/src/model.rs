use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::warn;

use a7137_hla::{BusEvent, DataFrame, Timestamp};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("capture is empty")]
    MissingHeader,
    #[error("header has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("line {line}: {msg}")]
    Row { line: usize, msg: String },
}

/// Column positions in a Saleae Logic SPI analyzer export.
struct Columns {
    kind: usize,
    start: usize,
    duration: usize,
    mosi: Option<usize>,
    miso: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, ParseError> {
        let names: Vec<String> = split_row(header)
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        Ok(Self {
            kind: find("type").ok_or(ParseError::MissingColumn("type"))?,
            start: find("start_time").ok_or(ParseError::MissingColumn("start_time"))?,
            duration: find("duration").ok_or(ParseError::MissingColumn("duration"))?,
            mosi: find("mosi"),
            miso: find("miso"),
        })
    }
}

/// Splits one CSV row. Quoted fields may hold commas; `""` inside quotes is a
/// literal quote. Unquoted fields are trimmed.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut cur).trim().to_string()),
            _ => cur.push(c),
        }
    }
    fields.push(cur.trim().to_string());
    fields
}

fn parse_secs(field: Option<&str>, what: &str) -> Result<f64, String> {
    let s = field.ok_or_else(|| format!("missing {what}"))?;
    s.parse::<f64>().map_err(|_| format!("bad {what} `{s}`"))
}

fn parse_word(s: &str) -> Result<u8, String> {
    let v = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else {
        s.parse::<u8>()
    };
    v.map_err(|_| format!("bad data word `{s}`"))
}

fn parse_line_value(fields: &[String], col: Option<usize>) -> Result<Option<Vec<u8>>, String> {
    match col.and_then(|c| fields.get(c)) {
        Some(s) if !s.is_empty() => Ok(Some(vec![parse_word(s)?])),
        _ => Ok(None),
    }
}

/// Converts a CSV export into bus events. Rows of other frame types are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<BusEvent>, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());
    let (_, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let cols = Columns::from_header(header)?;

    let mut events = Vec::new();
    for (idx, line) in lines {
        let row = |msg: String| ParseError::Row { line: idx + 1, msg };
        let fields = split_row(line);
        let field = |c: usize| fields.get(c).map(String::as_str);
        let kind = field(cols.kind).unwrap_or_default();
        let start = parse_secs(field(cols.start), "start_time").map_err(row)?;
        let duration = parse_secs(field(cols.duration), "duration").map_err(row)?;
        let start_ts = Timestamp::from_secs_f64(start).map_err(|e| row(e.to_string()))?;
        let end_ts = Timestamp::from_secs_f64(start + duration).map_err(|e| row(e.to_string()))?;

        match kind {
            "enable" => events.push(BusEvent::Open { at: start_ts }),
            "disable" => events.push(BusEvent::Close {
                start: start_ts,
                end: end_ts,
            }),
            "result" => {
                let mosi = parse_line_value(&fields, cols.mosi).map_err(row)?;
                let miso = parse_line_value(&fields, cols.miso).map_err(row)?;
                events.push(BusEvent::Data(DataFrame {
                    start: start_ts,
                    end: end_ts,
                    mosi,
                    miso,
                }));
            }
            other => warn!(line = idx + 1, kind = other, "skipping frame"),
        }
    }
    Ok(events)
}

pub fn load_csv(path: &Path) -> Result<Vec<BusEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let events = parse_csv(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(events)
}
