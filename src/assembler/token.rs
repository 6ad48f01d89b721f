//! The lexer for smolisa assembly.

use logos::{Lexer, Logos};

use crate::instruction::{Opcode, Register};
use crate::symbol_table::Selector;

/// An assembler directive introduced by `#`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `#binary "<path>"`: splice the raw bytes of a file into the output.
    IncludeBinaryFile,

    /// `#offset <imm>`: zero-pad the output up to the given byte offset.
    ByteOffset,
}

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// The in-band invalid sentinel. Whitespace, commas and comments are
    /// skipped and never reach the token stream.
    #[error]
    #[regex(r"[ \t,]+", logos::skip)]
    #[regex(r";[^\n]*", logos::skip)]
    Error,

    #[regex(r"\r\n|\r|\n")]
    Newline,

    #[token(":")]
    Colon,

    #[regex("#[a-zA-Z_]*", directive_callback)]
    Directive(Directive),

    #[regex("[0-9][0-9a-zA-Z_]*", integral_callback)]
    #[regex(r"'[^'\n]'", character_callback)]
    Immediate(u16),

    #[regex(r#""[^"\n]*""#, |lex| {
        let slice = lex.slice();
        &slice[1..slice.len() - 1]
    })]
    StringLiteral(&'a str),

    /// A `"` that never sees its closing quote before the end of the line.
    #[regex(r#""[^"\n]*"#)]
    UnterminatedString,

    #[regex("~[a-zA-Z_]*", selector_callback)]
    ByteSelector(Selector),

    #[regex("li|liu|lb|sb|lw|sw|lrz|lrnz|add|sub|and|or|xor|shl|shr|swb", mnemonic_callback)]
    Mnemonic(Opcode),

    #[regex(r"\$[a-zA-Z0-9_]*", register_callback)]
    RegisterReference(Register),

    #[regex("[A-Za-z_][A-Za-z0-9_]*", Lexer::slice)]
    Label(&'a str),
}

fn directive_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Result<Directive, ()> {
    match lex.slice() {
        "#binary" => Ok(Directive::IncludeBinaryFile),
        "#offset" => Ok(Directive::ByteOffset),
        _ => Err(()),
    }
}

fn selector_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Result<Selector, ()> {
    match lex.slice() {
        "~low" => Ok(Selector::Low),
        "~high" => Ok(Selector::High),
        _ => Err(()),
    }
}

fn mnemonic_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Result<Opcode, ()> {
    Opcode::from_mnemonic(lex.slice()).ok_or(())
}

fn register_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Result<Register, ()> {
    Register::from_name(lex.slice()).ok_or(())
}

fn integral_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Result<u16, ()> {
    let slice = lex.slice();

    let (digits, base) = match slice.strip_prefix("0x") {
        Some(digits) => (digits, 16),
        None => (slice, 10),
    };

    u16::from_str_radix(digits, base).map_err(|_| ())
}

fn character_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> u16 {
    u16::from(lex.slice().as_bytes()[1])
}
