//! Types for representing instructions and their parts.

use std::convert::TryFrom;
use std::fmt;

use crate::{Byte, Word};

/// Bit masks over an instruction word or a register value.
pub mod masks {
    use crate::Word;

    /// The 4-bit opcode field in the low nibble of an instruction word.
    pub const OPCODE: Word = 0x000F;

    /// The low byte of a word.
    pub const LOWER_BYTE: Word = 0x00FF;

    /// The high byte of a word.
    pub const UPPER_BYTE: Word = 0xFF00;
}

/// Number of registers in the register file.
pub const REGISTER_COUNT: usize = 16;

/// The encoding format of an opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// Opcode, destination register and an 8-bit immediate.
    TypeI,

    /// Opcode and up to three registers.
    TypeR,
}

/// Instructions of the smolisa instruction set architecture.
///
/// The discriminant of each opcode is the value of the 4-bit opcode field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Loads an 8-bit immediate into the low byte of a register, preserving
    /// the high byte.
    Li = 0x0,

    /// Loads an 8-bit immediate into the high byte of a register, preserving
    /// the low byte.
    Liu = 0x1,

    /// Loads a byte from memory into the low byte of a register.
    Lb = 0x2,

    /// Stores the low byte of a register to memory.
    Sb = 0x3,

    /// Loads a word from memory into a register.
    Lw = 0x4,

    /// Stores a register to memory.
    Sw = 0x5,

    /// Copies a register into another if a condition register is zero.
    Lrz = 0x6,

    /// Copies a register into another if a condition register is non-zero.
    Lrnz = 0x7,

    /// Adds two registers, wrapping modulo 2^16.
    Add = 0x8,

    /// Subtracts two registers, wrapping modulo 2^16.
    Sub = 0x9,

    /// Performs a bitwise and of two registers.
    And = 0xA,

    /// Performs a bitwise or of two registers.
    Or = 0xB,

    /// Performs a bitwise xor of two registers.
    Xor = 0xC,

    /// Shifts a register left; shift amounts of 16 or more yield zero.
    Shl = 0xD,

    /// Shifts a register right logically; shift amounts of 16 or more yield
    /// zero.
    Shr = 0xE,

    /// Combines the high byte of one register with the low byte of another,
    /// swapped into the opposite halves.
    Swb = 0xF,
}

/// All opcodes, in opcode-field order.
pub const OPCODES: [Opcode; 16] = [
    Opcode::Li,
    Opcode::Liu,
    Opcode::Lb,
    Opcode::Sb,
    Opcode::Lw,
    Opcode::Sw,
    Opcode::Lrz,
    Opcode::Lrnz,
    Opcode::Add,
    Opcode::Sub,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Shl,
    Opcode::Shr,
    Opcode::Swb,
];

impl Opcode {
    /// Looks up an opcode by its assembly mnemonic. Mnemonics are
    /// case-sensitive and lowercase.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        let opcode = match mnemonic {
            "li" => Opcode::Li,
            "liu" => Opcode::Liu,
            "lb" => Opcode::Lb,
            "sb" => Opcode::Sb,
            "lw" => Opcode::Lw,
            "sw" => Opcode::Sw,
            "lrz" => Opcode::Lrz,
            "lrnz" => Opcode::Lrnz,
            "add" => Opcode::Add,
            "sub" => Opcode::Sub,
            "and" => Opcode::And,
            "or" => Opcode::Or,
            "xor" => Opcode::Xor,
            "shl" => Opcode::Shl,
            "shr" => Opcode::Shr,
            "swb" => Opcode::Swb,
            _ => return None,
        };

        Some(opcode)
    }

    /// The assembly mnemonic of the opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Li => "li",
            Opcode::Liu => "liu",
            Opcode::Lb => "lb",
            Opcode::Sb => "sb",
            Opcode::Lw => "lw",
            Opcode::Sw => "sw",
            Opcode::Lrz => "lrz",
            Opcode::Lrnz => "lrnz",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Shl => "shl",
            Opcode::Shr => "shr",
            Opcode::Swb => "swb",
        }
    }

    /// The value of the opcode field.
    pub fn as_nibble(&self) -> Byte {
        *self as Byte
    }

    /// The encoding format of the opcode.
    pub fn format(&self) -> Format {
        match self {
            Opcode::Li | Opcode::Liu => Format::TypeI,
            _ => Format::TypeR,
        }
    }

    /// How many register operands the opcode takes in assembly. Unused
    /// operand slots encode as register zero.
    pub fn operand_count(&self) -> usize {
        match self {
            Opcode::Li | Opcode::Liu => 1,
            Opcode::Lb | Opcode::Sb | Opcode::Lw | Opcode::Sw => 2,
            _ => 3,
        }
    }

    /// The cycle cost charged for executing the opcode.
    pub fn cycles(&self) -> u64 {
        match self {
            Opcode::Li | Opcode::Liu => 2,
            Opcode::Lb | Opcode::Sb | Opcode::Lw | Opcode::Sw => 4,
            _ => 3,
        }
    }
}

impl TryFrom<Byte> for Opcode {
    type Error = ();

    fn try_from(nibble: Byte) -> Result<Opcode, ()> {
        OPCODES.get(nibble as usize).copied().ok_or(())
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A 4-bit register identifier.
///
/// Identifiers 0 through 13 name the general-purpose registers, 14 is the
/// instruction pointer and 15 is the bank register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    G0,
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    G7,
    G8,
    G9,
    G10,
    G11,
    G12,
    G13,
    Ip,
    Bank,
}

impl Register {
    /// Decodes a register from a 4-bit field. Only the low four bits of
    /// `nibble` are considered.
    pub fn from_nibble(nibble: Byte) -> Register {
        match nibble & 0xF {
            0 => Register::G0,
            1 => Register::G1,
            2 => Register::G2,
            3 => Register::G3,
            4 => Register::G4,
            5 => Register::G5,
            6 => Register::G6,
            7 => Register::G7,
            8 => Register::G8,
            9 => Register::G9,
            10 => Register::G10,
            11 => Register::G11,
            12 => Register::G12,
            13 => Register::G13,
            14 => Register::Ip,
            _ => Register::Bank,
        }
    }

    /// Looks up a register by its assembly name, leading `$` included.
    pub fn from_name(name: &str) -> Option<Register> {
        let register = match name {
            "$g0" => Register::G0,
            "$g1" => Register::G1,
            "$g2" => Register::G2,
            "$g3" => Register::G3,
            "$g4" => Register::G4,
            "$g5" => Register::G5,
            "$g6" => Register::G6,
            "$g7" => Register::G7,
            "$g8" => Register::G8,
            "$g9" => Register::G9,
            "$g10" => Register::G10,
            "$g11" => Register::G11,
            "$g12" => Register::G12,
            "$g13" => Register::G13,
            "$ip" => Register::Ip,
            "$bank" => Register::Bank,
            _ => return None,
        };

        Some(register)
    }

    /// The register's index into the register file.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The register's name without the leading `$`.
    pub fn name(&self) -> &'static str {
        match self {
            Register::G0 => "g0",
            Register::G1 => "g1",
            Register::G2 => "g2",
            Register::G3 => "g3",
            Register::G4 => "g4",
            Register::G5 => "g5",
            Register::G6 => "g6",
            Register::G7 => "g7",
            Register::G8 => "g8",
            Register::G9 => "g9",
            Register::G10 => "g10",
            Register::G11 => "g11",
            Register::G12 => "g12",
            Register::G13 => "g13",
            Register::Ip => "ip",
            Register::Bank => "bank",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

/// The fields of a TypeI instruction: a destination register and an 8-bit
/// immediate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeI {
    pub register: Register,
    pub immediate: Byte,
}

impl TypeI {
    /// Packs the fields and an opcode into an instruction word.
    pub fn encode(&self, opcode: Opcode) -> Word {
        Word::from(opcode.as_nibble())
            | (self.register.index() as Word) << 4
            | Word::from(self.immediate) << 8
    }
}

impl From<Word> for TypeI {
    fn from(word: Word) -> TypeI {
        TypeI {
            register: Register::from_nibble((word >> 4) as Byte),
            immediate: (word >> 8) as Byte,
        }
    }
}

/// The fields of a TypeR instruction: up to three registers. The meaning of
/// each field depends on the opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeR {
    pub r1: Register,
    pub r2: Register,
    pub r3: Register,
}

impl TypeR {
    /// Packs the fields and an opcode into an instruction word.
    pub fn encode(&self, opcode: Opcode) -> Word {
        Word::from(opcode.as_nibble())
            | (self.r1.index() as Word) << 4
            | (self.r2.index() as Word) << 8
            | (self.r3.index() as Word) << 12
    }
}

impl From<Word> for TypeR {
    fn from(word: Word) -> TypeR {
        TypeR {
            r1: Register::from_nibble((word >> 4) as Byte),
            r2: Register::from_nibble((word >> 8) as Byte),
            r3: Register::from_nibble((word >> 12) as Byte),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_nibbles_round_trip() {
        for (index, opcode) in OPCODES.iter().enumerate() {
            assert_eq!(opcode.as_nibble() as usize, index);
            assert_eq!(Opcode::try_from(opcode.as_nibble()), Ok(*opcode));
            assert_eq!(Opcode::from_mnemonic(opcode.mnemonic()), Some(*opcode));
        }

        assert!(Opcode::try_from(0x10).is_err());
    }

    #[test]
    fn encodings_keep_the_opcode_in_the_low_nibble() {
        for opcode in OPCODES.iter() {
            let word = match opcode.format() {
                Format::TypeI => TypeI {
                    register: Register::G3,
                    immediate: 0xAB,
                }
                .encode(*opcode),
                Format::TypeR => TypeR {
                    r1: Register::G1,
                    r2: Register::G2,
                    r3: Register::G3,
                }
                .encode(*opcode),
            };

            assert_eq!((word & masks::OPCODE) as Byte, opcode.as_nibble());
            assert_eq!(word.to_le_bytes()[0] & 0x0F, opcode.as_nibble());
        }
    }

    #[test]
    fn type_i_fields_round_trip() {
        let fields = TypeI {
            register: Register::G13,
            immediate: 0x7F,
        };

        assert_eq!(TypeI::from(fields.encode(Opcode::Li)), fields);
    }

    #[test]
    fn type_r_fields_round_trip() {
        let fields = TypeR {
            r1: Register::Ip,
            r2: Register::Bank,
            r3: Register::G5,
        };

        assert_eq!(TypeR::from(fields.encode(Opcode::Add)), fields);
    }

    #[test]
    fn register_names_round_trip() {
        for index in 0..REGISTER_COUNT {
            let register = Register::from_nibble(index as Byte);
            assert_eq!(register.index(), index);
            assert_eq!(Register::from_name(&register.to_string()), Some(register));
        }

        assert_eq!(Register::from_name("$g14"), None);
        assert_eq!(Register::from_name("g0"), None);
    }
}
