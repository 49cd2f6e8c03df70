use std::collections::HashMap;

use pretty_assertions::assert_eq;

use a7137_hla::analyzer::Transaction;
use a7137_hla::{
    Analyzer, AnalyzerConfig, AnnotationKind, BusEvent, Direction, SettingsError, Source,
};

#[test]
fn empty_transaction_emits_nothing() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    let out = an.run(&[BusEvent::open(0), BusEvent::close(10, 20)]);
    assert!(out.is_empty());
    assert!(!an.is_active());
}

#[test]
fn state_resets_between_transactions() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    // a two nibble register access, then a lone strobe
    let evs = vec![
        BusEvent::open(0),
        BusEvent::mosi(100, 500, &[0x0]),
        BusEvent::mosi(500, 900, &[0x1]),
        BusEvent::close(900, 1_000),
        BusEvent::open(2_000),
        BusEvent::mosi(2_100, 2_500, &[0xC]),
        BusEvent::close(2_500, 2_600),
    ];
    let out = an.run(&evs);
    let labels: Vec<&str> = out.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["Mode Control Register", "Strobe: RX Mode"]);
    assert_eq!((out[0].start.0, out[0].end.0), (100, 900));
    assert_eq!(*an.transaction(), Transaction::default());
}

#[test]
fn open_discards_unfinished_transaction() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    let evs = vec![
        BusEvent::open(0),
        BusEvent::mosi(100, 500, &[0x0]),
        BusEvent::open(600),
        BusEvent::mosi(700, 1_100, &[0xD]),
        BusEvent::close(1_100, 1_200),
    ];
    let out = an.run(&evs);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].label, "Strobe: TX Mode");
}

#[test]
fn data_outside_chip_select_is_dropped() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    let evs = vec![
        BusEvent::mosi(100, 500, &[0xC]),
        BusEvent::close(500, 600),
    ];
    assert!(an.run(&evs).is_empty());
    assert_eq!(an.transaction().count, 0);
}

#[test]
fn implicit_transaction_when_chip_select_not_required() {
    let cfg = AnalyzerConfig {
        require_open: false,
        ..AnalyzerConfig::default()
    };
    let mut an = Analyzer::new(cfg);
    let evs = vec![
        BusEvent::mosi(100, 500, &[0xC]),
        BusEvent::close(500, 600),
        BusEvent::mosi(700, 1_100, &[0x9]),
        BusEvent::close(1_100, 1_200),
    ];
    let out = an.run(&evs);
    let labels: Vec<&str> = out.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["Strobe: RX Mode", "Strobe: Idle Mode"]);
}

#[test]
fn miso_source_ignores_mosi() {
    let cfg = AnalyzerConfig {
        source: Source::Miso,
        ..AnalyzerConfig::default()
    };
    let mut an = Analyzer::new(cfg);
    let evs = vec![
        BusEvent::open(0),
        BusEvent::mosi(100, 500, &[0xC]),
        BusEvent::miso(500, 900, &[0xE]),
        BusEvent::close(900, 1_000),
    ];
    let out = an.run(&evs);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].label, "Strobe: Fifo Write Pointer Reset");
}

#[test]
fn debug_annotations_carry_line_and_count() {
    let cfg = AnalyzerConfig {
        emit_debug: true,
        ..AnalyzerConfig::default()
    };
    let mut an = Analyzer::new(cfg);
    let evs = vec![
        BusEvent::open(0),
        BusEvent::mosi(100, 500, &[0x0, 0x1, 0x1]),
        BusEvent::close(500, 600),
    ];
    let out = an.run(&evs);
    let debug: Vec<(Direction, &str)> = out
        .iter()
        .filter(|a| a.kind == AnnotationKind::Debug)
        .map(|a| (a.dir, a.label.as_str()))
        .collect();
    assert_eq!(
        debug,
        vec![
            (Direction::Mosi, "4b_seen=0x0 (count=1)"),
            (Direction::Mosi, "4b_seen=0x1 (count=2)"),
            (Direction::Mosi, "4b_seen=0x1 (count=3)"),
        ]
    );
    assert_eq!(out.last().map(|a| a.kind), Some(AnnotationKind::Strobe));
}

#[test]
fn settings_from_host_choices() {
    let settings: HashMap<String, String> = [
        ("source", "Both"),
        ("require_cs", "False"),
        ("emit_debug", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let cfg = AnalyzerConfig::from_settings(&settings).unwrap();
    assert_eq!(
        cfg,
        AnalyzerConfig {
            source: Source::Both,
            require_open: false,
            emit_debug: true,
        }
    );
    assert_eq!(
        AnalyzerConfig::from_settings(&HashMap::new()).unwrap(),
        AnalyzerConfig::default()
    );
}

#[test]
fn bad_settings_are_reported() {
    let mut settings = HashMap::new();
    settings.insert("emit_debug".to_string(), "maybe".to_string());
    assert_eq!(
        AnalyzerConfig::from_settings(&settings),
        Err(SettingsError::InvalidChoice {
            key: "emit_debug".into(),
            value: "maybe".into(),
        })
    );
    let mut settings = HashMap::new();
    settings.insert("clock".to_string(), "MOSI".to_string());
    assert_eq!(
        AnalyzerConfig::from_settings(&settings),
        Err(SettingsError::UnknownKey("clock".into()))
    );
}

#[test]
fn independent_instances_keep_separate_clocks() {
    let mut a = Analyzer::new(AnalyzerConfig::default());
    let mut b = Analyzer::new(AnalyzerConfig::default());
    let evs = vec![
        BusEvent::open(0),
        BusEvent::mosi(100, 500, &[0xC]),
        BusEvent::close(500, 600),
    ];
    let first = a.run(&evs);
    let second = b.run(&evs);
    assert_eq!(first, second);
}
