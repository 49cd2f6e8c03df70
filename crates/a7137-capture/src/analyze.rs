use std::collections::BTreeMap;

use serde::Serialize;

use a7137_hla::{Analyzer, AnalyzerConfig, Annotation, AnnotationKind, BusEvent, Direction};

/// Counts over one decoded capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub transactions: usize,
    pub strobes: usize,
    pub reads: usize,
    pub writes: usize,
    /// Closed transactions that named nothing.
    pub unresolved: usize,
    pub debug: usize,
    pub labels: BTreeMap<String, usize>,
}

impl Summary {
    fn record(&mut self, a: &Annotation) {
        if a.kind == AnnotationKind::Debug {
            self.debug += 1;
            return;
        }
        match a.dir {
            Direction::Read => self.reads += 1,
            Direction::Write => self.writes += 1,
            _ => self.strobes += 1,
        }
        *self.labels.entry(a.label.clone()).or_default() += 1;
    }
}

/// Decodes `events` and returns the annotations together with their counts.
pub fn summarize(events: &[BusEvent], cfg: AnalyzerConfig) -> (Vec<Annotation>, Summary) {
    let mut analyzer = Analyzer::new(cfg);
    let mut summary = Summary::default();
    let mut out = Vec::new();

    for ev in events {
        let counted = matches!(ev, BusEvent::Close { .. })
            && (analyzer.is_active() || !cfg.require_open);
        let produced = analyzer.feed(ev);
        if counted {
            summary.transactions += 1;
            if !produced.iter().any(|a| a.kind == AnnotationKind::Strobe) {
                summary.unresolved += 1;
            }
        }
        for a in &produced {
            summary.record(a);
        }
        out.extend(produced);
    }
    (out, summary)
}
