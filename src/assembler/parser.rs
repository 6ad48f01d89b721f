//! The assembler proper: statement parsing, byte emission and fix-up
//! resolution.

use logos::{Logos, Span};

use crate::error::{AssemblerError, LexError, LinkError, ParseError};
use crate::instruction::{Format, Opcode, Register, TypeI, TypeR};
use crate::mmu::BANK_SIZE;
use crate::symbol_table::{Fixup, SymbolTable};
use crate::{Byte, Word};

use super::token::{Directive, Token};

type Result<T> = std::result::Result<T, AssemblerError>;

/// A token together with its source span and line number.
#[derive(Debug, Clone)]
struct SpannedToken<'a> {
    token: Token<'a>,
    span: Span,
    line: usize,
}

fn tokenize(source: &str) -> Vec<SpannedToken<'_>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;

    while let Some(token) = lexer.next() {
        let is_newline = token == Token::Newline;

        tokens.push(SpannedToken {
            token,
            span: lexer.span(),
            line,
        });

        if is_newline {
            line += 1;
        }
    }

    tokens
}

/// Assembles a source text into a byte image.
pub fn assemble(source: &str) -> Result<Vec<Byte>> {
    Assembler::new(source).assemble()
}

/// Incremental state of an assembly run over one source text.
pub struct Assembler<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken<'a>>,
    position: usize,
    output: Vec<Byte>,
    symbol_table: SymbolTable<'a>,
}

impl<'a> Assembler<'a> {
    pub fn new(source: &'a str) -> Assembler<'a> {
        Assembler {
            source,
            tokens: tokenize(source),
            position: 0,
            output: Vec::new(),
            symbol_table: SymbolTable::new(),
        }
    }

    /// Runs both passes and returns the finished byte image.
    pub fn assemble(mut self) -> Result<Vec<Byte>> {
        while let Some(spanned) = self.peek().cloned() {
            let line = spanned.line;

            match spanned.token {
                Token::Newline => {
                    self.advance();
                }
                Token::Label(label) => self.take_label_definition(label)?,
                Token::Directive(directive) => self.take_directive(directive)?,
                Token::Mnemonic(opcode) => self.take_instruction(opcode)?,
                Token::Error => {
                    let slice = self.source[spanned.span].to_string();
                    return Err(LexError::InvalidToken { line, slice }.into());
                }
                Token::UnterminatedString => {
                    return Err(LexError::UnterminatedString { line }.into());
                }
                ref token => {
                    return Err(self.unexpected(token, line, "a label, a directive or an instruction"));
                }
            }
        }

        self.apply_fixups()?;

        if self.output.len() > BANK_SIZE {
            return Err(LinkError::ImageTooLarge {
                size: self.output.len(),
            }
            .into());
        }

        Ok(self.output)
    }

    fn peek(&self) -> Option<&SpannedToken<'a>> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<SpannedToken<'a>> {
        let token = self.tokens.get(self.position).cloned();

        if token.is_some() {
            self.position += 1;
        }

        token
    }

    fn unexpected(&self, token: &Token, line: usize, expected: &'static str) -> AssemblerError {
        ParseError::UnexpectedToken {
            line,
            got: format!("{:?}", token),
            expected,
        }
        .into()
    }

    fn next_or_eof(&mut self, expected: &'static str) -> Result<SpannedToken<'a>> {
        self.advance()
            .ok_or_else(|| ParseError::EndOfInput { expected }.into())
    }

    /// `label:` binds the name to the current output offset.
    fn take_label_definition(&mut self, label: &'a str) -> Result<()> {
        let line = self.next_or_eof("a label")?.line;

        match self.next_or_eof("a ':' after the label name")? {
            SpannedToken {
                token: Token::Colon,
                ..
            } => (),
            SpannedToken { token, line, .. } => {
                return Err(self.unexpected(&token, line, "a ':' after the label name"));
            }
        }

        self.symbol_table
            .define_symbol(label, self.output.len() as Word)
            .map_err(|_previous| ParseError::DuplicateLabel {
                line,
                label: label.to_string(),
            })?;

        Ok(())
    }

    fn take_directive(&mut self, directive: Directive) -> Result<()> {
        let line = self.next_or_eof("a directive")?.line;

        match directive {
            Directive::ByteOffset => {
                let target = match self.next_or_eof("an offset value")? {
                    SpannedToken {
                        token: Token::Immediate(value),
                        ..
                    } => value as usize,
                    SpannedToken { token, line, .. } => {
                        return Err(self.unexpected(&token, line, "an offset value"));
                    }
                };

                if target < self.output.len() {
                    return Err(LinkError::OffsetBackwards {
                        line,
                        target,
                        position: self.output.len(),
                    }
                    .into());
                }

                self.output.resize(target, 0);
            }
            Directive::IncludeBinaryFile => {
                let path = match self.next_or_eof("a file path string")? {
                    SpannedToken {
                        token: Token::StringLiteral(path),
                        ..
                    } => path,
                    SpannedToken {
                        token: Token::UnterminatedString,
                        line,
                        ..
                    } => {
                        return Err(LexError::UnterminatedString { line }.into());
                    }
                    SpannedToken { token, line, .. } => {
                        return Err(self.unexpected(&token, line, "a file path string"));
                    }
                };

                let bytes = std::fs::read(path).map_err(|source| AssemblerError::Io {
                    path: path.to_string(),
                    source,
                })?;

                self.output.extend(bytes);
            }
        }

        self.take_end_of_line()
    }

    /// Emits the two little-endian bytes of one instruction.
    fn take_instruction(&mut self, opcode: Opcode) -> Result<()> {
        self.advance();

        let word = match opcode.format() {
            Format::TypeI => {
                let register = self.take_register()?;
                let immediate = self.take_immediate_byte()?;

                TypeI {
                    register,
                    immediate,
                }
                .encode(opcode)
            }
            Format::TypeR => {
                let mut registers = [Register::G0; 3];

                for slot in registers.iter_mut().take(opcode.operand_count()) {
                    *slot = self.take_register()?;
                }

                TypeR {
                    r1: registers[0],
                    r2: registers[1],
                    r3: registers[2],
                }
                .encode(opcode)
            }
        };

        self.output.extend_from_slice(&word.to_le_bytes());

        self.take_end_of_line()
    }

    fn take_register(&mut self) -> Result<Register> {
        match self.next_or_eof("a register")? {
            SpannedToken {
                token: Token::RegisterReference(register),
                ..
            } => Ok(register),
            SpannedToken { token, line, .. } => Err(self.unexpected(&token, line, "a register")),
        }
    }

    /// Reads the immediate operand of a TypeI instruction. A label reference
    /// records a fix-up for the immediate byte and emits a zero placeholder.
    fn take_immediate_byte(&mut self) -> Result<Byte> {
        match self.next_or_eof("an immediate or a ~low/~high label reference")? {
            SpannedToken {
                token: Token::Immediate(value),
                line,
                ..
            } => {
                if value > 0xFF {
                    return Err(ParseError::ImmediateTooWide { line, value }.into());
                }

                Ok(value as Byte)
            }
            SpannedToken {
                token: Token::ByteSelector(selector),
                ..
            } => {
                let label = self.take_label_reference()?;

                // The immediate byte is the second of the two emitted bytes.
                self.symbol_table.reference_symbol(
                    label,
                    Fixup {
                        offset: self.output.len() + 1,
                        selector,
                    },
                );

                Ok(0)
            }
            SpannedToken {
                token: Token::Label(label),
                line,
                ..
            } => Err(ParseError::MissingSelector {
                line,
                label: label.to_string(),
            }
            .into()),
            SpannedToken { token, line, .. } => {
                Err(self.unexpected(&token, line, "an immediate or a ~low/~high label reference"))
            }
        }
    }

    fn take_label_reference(&mut self) -> Result<&'a str> {
        match self.next_or_eof("a label name")? {
            SpannedToken {
                token: Token::Label(label),
                ..
            } => Ok(label),
            SpannedToken { token, line, .. } => Err(self.unexpected(&token, line, "a label name")),
        }
    }

    fn take_end_of_line(&mut self) -> Result<()> {
        match self.peek().cloned() {
            None => Ok(()),
            Some(SpannedToken {
                token: Token::Newline,
                ..
            }) => {
                self.advance();
                Ok(())
            }
            Some(SpannedToken { token, line, .. }) => {
                Err(self.unexpected(&token, line, "the end of the line"))
            }
        }
    }

    /// The second pass: patch every fix-up with the selected byte of its
    /// label's resolved address.
    fn apply_fixups(&mut self) -> Result<()> {
        for (label, entry) in self.symbol_table.iter() {
            if entry.fixups().is_empty() {
                continue;
            }

            let address = entry.address().ok_or_else(|| LinkError::UnresolvedLabel {
                label: label.to_string(),
            })?;

            for fixup in entry.fixups() {
                self.output[fixup.offset] = fixup.selector.apply(address);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_a_type_i_instruction() {
        assert_eq!(assemble("li $g0, 0x2A\n").unwrap(), vec![0x00, 0x2A]);
    }

    #[test]
    fn assembles_type_r_instructions_with_unused_slots_zeroed() {
        // lb: r1 = address, r2 = destination, r3 unused.
        assert_eq!(assemble("lb $g1, $g2").unwrap(), vec![0x12, 0x02]);

        // add: r1 = destination, r2 and r3 = sources.
        assert_eq!(assemble("add $g2, $g0, $g1").unwrap(), vec![0x28, 0x10]);
    }

    #[test]
    fn resolves_backward_label_references() {
        let image = assemble("start: li $g0, 0\nliu $g0, ~high start\nli $g1, ~low start\n")
            .unwrap();

        assert_eq!(image, vec![0x00, 0x00, 0x01, 0x00, 0x10, 0x00]);
    }

    #[test]
    fn resolves_forward_label_references() {
        let image = assemble(
            "li $g0, ~low end\nliu $g0, ~high end\nadd $g1, $g0, $g0\nend:\n",
        )
        .unwrap();

        // `end` sits past three instructions, at offset 6.
        assert_eq!(image[1], 0x06);
        assert_eq!(image[3], 0x00);
    }

    #[test]
    fn labels_may_share_a_line_with_an_instruction() {
        let image = assemble("loop: or $ip $g0 $g0\n").unwrap();

        assert_eq!(image, vec![0xEB, 0x00]);
    }

    #[test]
    fn offset_directive_pads_with_zeroes() {
        let image = assemble("li $g0, 1\n#offset 8\nli $g0, 2\n").unwrap();

        assert_eq!(image, vec![0x00, 0x01, 0, 0, 0, 0, 0, 0, 0x00, 0x02]);
    }

    #[test]
    fn offset_directive_cannot_move_backwards() {
        let error = assemble("#offset 4\n#offset 2\n").unwrap_err();

        assert!(matches!(
            error,
            AssemblerError::Link(LinkError::OffsetBackwards {
                target: 2,
                position: 4,
                ..
            })
        ));
    }

    #[test]
    fn bare_labels_are_rejected_as_immediates() {
        let error = assemble("li $g0, start\nstart:\n").unwrap_err();

        assert!(matches!(
            error,
            AssemblerError::Parse(ParseError::MissingSelector { .. })
        ));
    }

    #[test]
    fn unresolved_labels_are_reported_by_name() {
        let error = assemble("li $g0, ~low nowhere\n").unwrap_err();

        match error {
            AssemblerError::Link(LinkError::UnresolvedLabel { label }) => {
                assert_eq!(label, "nowhere");
            }
            other => panic!("expected an unresolved label error, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let error = assemble("here:\nhere:\n").unwrap_err();

        assert!(matches!(
            error,
            AssemblerError::Parse(ParseError::DuplicateLabel { line: 2, .. })
        ));
    }

    #[test]
    fn wide_immediates_are_rejected() {
        let error = assemble("li $g0, 0x100\n").unwrap_err();

        assert!(matches!(
            error,
            AssemblerError::Parse(ParseError::ImmediateTooWide { value: 0x100, .. })
        ));
    }

    #[test]
    fn invalid_tokens_carry_their_line() {
        let error = assemble("li $g0, 1\n%quux\n").unwrap_err();

        match error {
            AssemblerError::Lex(LexError::InvalidToken { line, slice }) => {
                assert_eq!(line, 2);
                assert_eq!(slice, "%");
            }
            other => panic!("expected an invalid token error, got {:?}", other),
        }
    }

    #[test]
    fn character_literals_are_type_i_immediates() {
        assert_eq!(assemble("li $g0, 'A'\n").unwrap(), vec![0x00, 0x41]);
    }

    #[test]
    fn missing_operands_are_unexpected() {
        let error = assemble("add $g0, $g1\n").unwrap_err();

        assert!(matches!(
            error,
            AssemblerError::Parse(ParseError::UnexpectedToken { .. })
        ));
    }
}
