//! Error types shared between the assembler and the emulator.

use thiserror::Error;

/// Lexical errors. The tokenizer itself reports oddities in-band via
/// [`Token::Error`](crate::assembler::token::Token::Error); the assembler
/// promotes them to one of these when it decides to fail.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("line {line}: invalid token '{slice}'")]
    InvalidToken { line: usize, slice: String },
}

/// Errors for token sequences that do not fit the assembly grammar.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: unexpected {got}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        got: String,
        expected: &'static str,
    },

    #[error("unexpected end of input, expected {expected}")]
    EndOfInput { expected: &'static str },

    #[error("line {line}: immediate {value:#x} does not fit in one byte")]
    ImmediateTooWide { line: usize, value: u16 },

    #[error("line {line}: label '{label}' used as an immediate needs a ~low or ~high selector")]
    MissingSelector { line: usize, label: String },

    #[error("line {line}: label '{label}' is defined twice")]
    DuplicateLabel { line: usize, label: String },
}

/// Errors raised while resolving labels and laying out the output image.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("unresolved label '{label}'")]
    UnresolvedLabel { label: String },

    #[error("line {line}: #offset {target:#06x} is behind the current output position {position:#06x}")]
    OffsetBackwards {
        line: usize,
        target: usize,
        position: usize,
    },

    #[error("program image is {size} bytes, which does not fit in a 64 KiB bank")]
    ImageTooLarge { size: usize },
}

/// Any failure the assembler can report.
#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("could not read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A rejection reported by a memory-mapped peripheral.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("peripheral rejected a write of {value:#04x} to address {address:#06x}")]
    WriteRejected { address: u16, value: u8 },

    #[error("peripheral rejected a read from address {address:#06x}")]
    ReadRejected { address: u16 },
}

/// Fatal faults raised by the dispatch loop.
#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("instruction pointer {ip:#06x} is not aligned to two bytes")]
    AlignmentFault { ip: u16 },

    #[error("illegal opcode in instruction word {word:#06x}")]
    IllegalOpcode { word: u16 },

    #[error(transparent)]
    Peripheral(#[from] DeviceError),
}
