use pretty_assertions::assert_eq;

use a7137_hla::decoder::CommandSet;
use a7137_hla::tables::RegisterName;
use a7137_hla::{Analyzer, AnalyzerConfig, Annotation, BusEvent, Direction};

fn decode_one<C: CommandSet>(an: &mut Analyzer<C>, nibbles: &[u8]) -> Vec<Annotation> {
    let mut evs = vec![BusEvent::open(0)];
    let s = 1_000;
    evs.push(BusEvent::mosi(s, s + 800, nibbles));
    evs.push(BusEvent::close(2_000, 2_100));
    an.run(&evs)
}

fn summary(out: &[Annotation]) -> Vec<(Direction, String, String)> {
    out.iter()
        .map(|a| (a.dir, a.label.clone(), a.value_hex()))
        .collect()
}

#[test]
fn mode_control_write_and_read() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    assert_eq!(
        summary(&decode_one(&mut an, &[0x0, 0x1])),
        vec![(Direction::Write, "Mode Control Register".to_string(), "0x1".to_string())]
    );
    assert_eq!(
        summary(&decode_one(&mut an, &[0x4, 0x1])),
        vec![(Direction::Read, "Mode Control Register".to_string(), "0x41".to_string())]
    );
}

#[test]
fn split_register_name_follows_direction() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    assert_eq!(decode_one(&mut an, &[0x0, 0x0])[0].label, "Reset Register");
    assert_eq!(decode_one(&mut an, &[0x4, 0x0])[0].label, "Mode Register");
}

#[test]
fn rc_osc_register() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    let out = decode_one(&mut an, &[0x0, 0x8]);
    assert_eq!(out[0].label, "RC OSC Register I");
    assert_eq!(out[0].dir, Direction::Write);
}

#[test]
fn unassigned_register_is_silent() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    assert!(decode_one(&mut an, &[0x0, 0x7]).is_empty());
    assert!(decode_one(&mut an, &[0x3, 0xF]).is_empty());
}

#[test]
fn extra_nibbles_do_not_change_classification() {
    let mut an = Analyzer::new(AnalyzerConfig::default());
    let short = summary(&decode_one(&mut an, &[0x0, 0x1]));
    let long = summary(&decode_one(&mut an, &[0x0, 0x1, 0x1, 0x1]));
    assert_eq!(short, long);
}

struct EveryAddress;

impl CommandSet for EveryAddress {
    fn strobe(&self, opcode: u8) -> Option<&'static str> {
        (opcode >= 0x8).then_some("strobe")
    }
    fn register(&self, key: u8) -> Option<RegisterName> {
        (key == 0x80).then_some(RegisterName::Single("shadow register"))
    }
}

#[test]
fn register_reading_takes_precedence_over_strobe_argument() {
    let mut an = Analyzer::with_commands(AnalyzerConfig::default(), EveryAddress);
    let out = decode_one(&mut an, &[0x8, 0x0]);
    assert_eq!(
        summary(&out),
        vec![(Direction::Write, "shadow register".to_string(), "0x80".to_string())]
    );
}
