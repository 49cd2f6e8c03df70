use crate::decoder::CommandSet;
use crate::tables::{find_register, find_strobe, RegisterDesc, RegisterName, StrobeDesc};

/// AMICCOM A7137 strobe and control register set.
#[derive(Debug, Clone, Copy, Default)]
pub struct A7137;

impl A7137 {
    pub fn new() -> Self {
        Self
    }
}

impl CommandSet for A7137 {
    fn strobe(&self, opcode: u8) -> Option<&'static str> {
        find_strobe(STROBES, opcode)
    }

    fn register(&self, key: u8) -> Option<RegisterName> {
        find_register(REGISTERS, key)
    }
}

pub const STROBES: &[StrobeDesc] = &[
    StrobeDesc { opcode: 0x8, name: "Strobe: SleepMode" },
    StrobeDesc { opcode: 0x9, name: "Strobe: Idle Mode" },
    StrobeDesc { opcode: 0xA, name: "Strobe: Standby Mode" },
    StrobeDesc { opcode: 0xB, name: "Strobe: PLL Mode" },
    StrobeDesc { opcode: 0xC, name: "Strobe: RX Mode" },
    StrobeDesc { opcode: 0xD, name: "Strobe: TX Mode" },
    StrobeDesc { opcode: 0xE, name: "Strobe: Fifo Write Pointer Reset" },
    StrobeDesc { opcode: 0xF, name: "Strobe: Fifo Read Pointer Reset" },
];

const fn reg(addr: u8, name: &'static str) -> RegisterDesc {
    RegisterDesc { addr, name: RegisterName::Single(name) }
}

// 0x07 is not assigned.
pub const REGISTERS: &[RegisterDesc] = &[
    RegisterDesc {
        addr: 0x00,
        name: RegisterName::Split { write: "Reset Register", read: "Mode Register" },
    },
    reg(0x01, "Mode Control Register"),
    reg(0x02, "Calibration Control Register"),
    reg(0x03, "FIFO Register I"),
    reg(0x04, "FIFO Register II"),
    reg(0x05, "FIFO DATA Register"),
    reg(0x06, "ID DATA Register"),
    reg(0x08, "RC OSC Register I"),
    reg(0x09, "RC OSC Register II"),
    reg(0x0A, "RC OSC Register III"),
    reg(0x0B, "CKO Pin Control Register"),
    reg(0x0C, "GIO1 Pin Control Register"),
    reg(0x0D, "GIO2 Pin Control Register"),
    reg(0x0E, "Clock Register"),
    reg(0x0F, "Data Rate Register"),
    reg(0x10, "PLL Register I"),
    reg(0x11, "PLL Register II"),
    reg(0x12, "PLL Register III"),
    reg(0x13, "PLL Register IV"),
    reg(0x14, "PLL Register V"),
    reg(0x15, "TX Register I"),
    reg(0x16, "TX Register II"),
    reg(0x17, "Delay Register I"),
    reg(0x18, "Delay Register II"),
    reg(0x19, "RX Register"),
    reg(0x1A, "RX Gain Register I"),
    reg(0x1B, "RX Gain Register II"),
    reg(0x1C, "RX Gain Register III"),
    reg(0x1D, "RX Gain Register IV"),
    reg(0x1E, "RSSI Threshold Register"),
    reg(0x1F, "ADC Control Register"),
    reg(0x20, "Code Register I"),
    reg(0x21, "Code Register II"),
    reg(0x22, "Code Register III"),
    reg(0x23, "IF Calibration Register I"),
    reg(0x24, "IF Calibration Register II"),
    reg(0x25, "VCO Current Calibration Register"),
    reg(0x26, "VCO Single Band Calibration Register I"),
    reg(0x27, "VCO Single Band Calibration Register II"),
    reg(0x28, "Battery Detect Register"),
    reg(0x29, "TX Test Register"),
    reg(0x2A, "RX DEM Test Register I"),
    reg(0x2B, "RX DEM Test Register II"),
    reg(0x2C, "Charge Pump Current Register"),
    reg(0x2D, "Crystal Test Register"),
    reg(0x2E, "PLL Test Register"),
    reg(0x2F, "VCO Test Register I"),
    reg(0x30, "VCO Test Register II"),
    reg(0x31, "IFAT Register"),
    reg(0x32, "RScale Register"),
    reg(0x33, "Filter Test Register"),
];
