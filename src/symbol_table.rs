//! Label table with deferred fix-up records.
//!
//! Labels may be referenced before they are defined; each such reference
//! records a [Fixup] that the assembler patches once the whole source has
//! been walked.

use std::collections::HashMap;

use crate::{Byte, Word};

/// Which byte of a resolved label address a fix-up site receives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// The `~low` selector: bits 0..7 of the address.
    Low,

    /// The `~high` selector: bits 8..15 of the address.
    High,
}

impl Selector {
    /// Extracts the selected byte from a resolved address.
    pub fn apply(&self, address: Word) -> Byte {
        match self {
            Selector::Low => (address & 0x00FF) as Byte,
            Selector::High => (address >> 8) as Byte,
        }
    }
}

/// A deferred patch site in the output image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Fixup {
    /// Offset of the byte to patch, relative to the start of the output.
    pub offset: usize,

    /// Which byte of the resolved address to write there.
    pub selector: Selector,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTableEntry {
    defined: Option<Word>,
    fixups: Vec<Fixup>,
}

impl SymbolTableEntry {
    /// The resolved address of the label, if it has been defined.
    pub fn address(&self) -> Option<Word> {
        self.defined
    }

    /// The patch sites waiting on this label.
    pub fn fixups(&self) -> &[Fixup] {
        &self.fixups
    }
}

/// Mapping from label names to resolved addresses and pending fix-ups.
///
/// Borrows the label names from the source text.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable<'a> {
    inner: HashMap<&'a str, SymbolTableEntry>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> SymbolTable<'a> {
        SymbolTable {
            inner: HashMap::new(),
        }
    }

    /// Binds `label` to `address`. Returns the previous address if the label
    /// was already defined.
    pub fn define_symbol(&mut self, label: &'a str, address: Word) -> Result<(), Word> {
        let entry = self.inner.entry(label).or_default();

        if let Some(previous) = entry.defined {
            return Err(previous);
        }

        entry.defined = Some(address);
        Ok(())
    }

    /// Records a fix-up against `label`, creating the entry if the label has
    /// not been seen yet.
    pub fn reference_symbol(&mut self, label: &'a str, fixup: Fixup) {
        self.inner.entry(label).or_default().fixups.push(fixup);
    }

    /// The resolved address of `label`, if any.
    pub fn address_of(&self, label: &str) -> Option<Word> {
        self.inner.get(label).and_then(|entry| entry.defined)
    }

    /// Iterates over all labels and their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &SymbolTableEntry)> {
        self.inner.iter().map(|(label, entry)| (*label, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_references_accumulate_fixups() {
        let mut table = SymbolTable::new();

        table.reference_symbol(
            "loop",
            Fixup {
                offset: 1,
                selector: Selector::Low,
            },
        );
        table.reference_symbol(
            "loop",
            Fixup {
                offset: 3,
                selector: Selector::High,
            },
        );

        assert_eq!(table.address_of("loop"), None);

        table.define_symbol("loop", 0x1234).unwrap();

        let (_, entry) = table.iter().next().unwrap();
        assert_eq!(entry.address(), Some(0x1234));
        assert_eq!(entry.fixups().len(), 2);
    }

    #[test]
    fn double_definition_reports_the_previous_address() {
        let mut table = SymbolTable::new();

        table.define_symbol("start", 0).unwrap();
        assert_eq!(table.define_symbol("start", 8), Err(0));
    }

    #[test]
    fn selectors_split_an_address() {
        assert_eq!(Selector::Low.apply(0xBEEF), 0xEF);
        assert_eq!(Selector::High.apply(0xBEEF), 0xBE);
    }
}
