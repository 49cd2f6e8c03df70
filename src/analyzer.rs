use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::decoder::{classify, Annotation, AnnotationKind, CommandSet, Direction};
use crate::error::{parse_choice_bool, SettingsError};
use crate::event::{BusEvent, DataFrame, Line, Source};
use crate::isa::a7137::A7137;
use crate::timing::{Monotonic, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub source: Source,
    /// Drop data seen outside a chip-select window.
    pub require_open: bool,
    /// Emit one debug annotation per nibble.
    pub emit_debug: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            source: Source::Mosi,
            require_open: true,
            emit_debug: false,
        }
    }
}

impl AnalyzerConfig {
    /// Builds a config from host setting choices. Missing keys keep defaults.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self, SettingsError> {
        let mut cfg = Self::default();
        for (key, value) in settings {
            match key.as_str() {
                "source" => cfg.source = value.parse()?,
                "require_cs" => cfg.require_open = parse_choice_bool(key, value)?,
                "emit_debug" => cfg.emit_debug = parse_choice_bool(key, value)?,
                _ => return Err(SettingsError::UnknownKey(key.clone())),
            }
        }
        Ok(cfg)
    }
}

/// Accumulated state of the chip-select window being decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub count: usize,
    pub first: Option<u8>,
    pub second: Option<u8>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl Transaction {
    fn push(&mut self, nib: u8, frame: &DataFrame) {
        self.count += 1;
        match self.count {
            1 => {
                self.first = Some(nib);
                self.start = Some(frame.start);
            }
            2 => self.second = Some(nib),
            _ => {}
        }
        self.end = Some(frame.end);
    }

    /// Data interval if it has positive width.
    fn data_interval(&self) -> Option<(Timestamp, Timestamp)> {
        match (self.start, self.end) {
            (Some(s), Some(e)) if e > s => Some((s, e)),
            _ => None,
        }
    }
}

/// Decodes one SPI channel. Owns all of its state; one instance per channel.
#[derive(Debug, Clone)]
pub struct Analyzer<C = A7137> {
    pub cfg: AnalyzerConfig,
    cmds: C,
    active: bool,
    txn: Transaction,
    clock: Monotonic,
}

impl Analyzer<A7137> {
    pub fn new(cfg: AnalyzerConfig) -> Self {
        Self::with_commands(cfg, A7137::new())
    }
}

impl<C: CommandSet> Analyzer<C> {
    pub fn with_commands(cfg: AnalyzerConfig, cmds: C) -> Self {
        Self {
            cfg,
            cmds,
            active: false,
            txn: Transaction::default(),
            clock: Monotonic::new(),
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feeds one bus event and returns what it produced, in emission order.
    pub fn feed(&mut self, event: &BusEvent) -> Vec<Annotation> {
        match event {
            BusEvent::Open { at } => {
                debug!(at = %at.0, "chip select asserted");
                self.active = true;
                self.txn = Transaction::default();
                Vec::new()
            }
            BusEvent::Data(frame) => self.on_data(frame),
            BusEvent::Close { start, end } => self.on_close(*start, *end).into_iter().collect(),
        }
    }

    /// Runs a whole event sequence through the analyzer.
    pub fn run<'a, I>(&mut self, events: I) -> Vec<Annotation>
    where
        I: IntoIterator<Item = &'a BusEvent>,
    {
        events.into_iter().flat_map(|ev| self.feed(ev)).collect()
    }

    fn on_data(&mut self, frame: &DataFrame) -> Vec<Annotation> {
        if self.cfg.require_open && !self.active {
            trace!(at = %frame.start.0, "data outside chip select dropped");
            return Vec::new();
        }
        let nibbles: Vec<(Line, u8)> = frame.nibbles(self.cfg.source).collect();
        let mut out = Vec::new();
        for (line, nib) in nibbles {
            self.txn.push(nib, frame);
            trace!(line = line.label(), nib, count = self.txn.count, "nibble");
            if self.cfg.emit_debug {
                let span = frame.start.span_to(frame.end);
                let (start, end) = self.clock.normalize(frame.start, frame.end, span);
                out.push(Annotation {
                    kind: AnnotationKind::Debug,
                    dir: Direction::from(line),
                    label: format!("4b_seen=0x{nib:X} (count={})", self.txn.count),
                    value: nib,
                    start,
                    end,
                });
            }
        }
        out
    }

    fn on_close(&mut self, close_start: Timestamp, close_end: Timestamp) -> Option<Annotation> {
        if self.cfg.require_open && !self.active {
            return None;
        }
        let txn = std::mem::take(&mut self.txn);
        self.active = false;
        debug!(nibbles = txn.count, "chip select released");

        let resolved = classify(&self.cmds, txn.count, txn.first, txn.second)?;

        let span = close_start.span_to(close_end);
        let (start, end) = txn
            .data_interval()
            .unwrap_or((close_start.plus(span / 4), close_start.plus(span / 2)));
        let (start, end) = self.clock.normalize(start, end, span);

        debug!(dir = resolved.dir.as_str(), label = resolved.label, value = resolved.value, "command");
        Some(Annotation {
            kind: AnnotationKind::Strobe,
            dir: resolved.dir,
            label: resolved.label.to_string(),
            value: resolved.value,
            start,
            end,
        })
    }
}
