use bitflags::bitflags;

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBits: u8 {
const READ = 1 << 6; // register read when set, write when clear
}
}

/// Register address with the direction bit cleared.
pub fn register_key(addr: u8) -> u8 {
    addr & !CommandBits::READ.bits()
}

pub fn is_read(addr: u8) -> bool {
    CommandBits::from_bits_truncate(addr).contains(CommandBits::READ)
}

#[derive(Debug, Clone, Copy)]
pub struct StrobeDesc {
    pub opcode: u8,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterName {
    Single(&'static str),
    /// Address whose meaning depends on the access direction.
    Split {
        write: &'static str,
        read: &'static str,
    },
}

impl RegisterName {
    pub fn for_access(self, read: bool) -> &'static str {
        match self {
            RegisterName::Single(name) => name,
            RegisterName::Split { write, read: r } => {
                if read {
                    r
                } else {
                    write
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegisterDesc {
    pub addr: u8,
    pub name: RegisterName,
}

pub fn find_strobe(table: &[StrobeDesc], opcode: u8) -> Option<&'static str> {
    table.iter().find(|d| d.opcode == opcode).map(|d| d.name)
}

pub fn find_register(table: &[RegisterDesc], key: u8) -> Option<RegisterName> {
    table.iter().find(|d| d.addr == key).map(|d| d.name)
}
