//! A crate for working with the smolisa instruction set architecture, a small
//! fixed-width 16-bit ISA with banked memory and a memory-mapped text
//! framebuffer.
//!
//! Currently this crate provides the functionality to:
//! - Tokenize and assemble `.smol` assembly sources into flat byte images.
//! - Execute byte images on an emulated core with cycle accounting.
//! - Route memory accesses through a banked MMU with a peripheral seam.
//!
//! # Example
//! ```
//! use smolisa::{
//!     assembler,
//!     emulator::Emulator,
//!     instruction::Register,
//!     mmu::Mmu,
//! };
//!
//! // Load the answer into the low byte of $g0.
//! let image = assembler::assemble("li $g0, 0x2A\n").unwrap();
//!
//! let mut mmu = Mmu::new();
//! mmu.load(0, 0, &image);
//!
//! let mut emulator = Emulator::new(mmu);
//! emulator.step().unwrap();
//!
//! assert_eq!(emulator.registers[Register::G0], 0x002A);
//! assert_eq!(emulator.registers[Register::Ip], 0x0002);
//! ```
//!
//! # Executables
//!
//! ## `smolisa-as`
//!
//! Assembles a source file and writes the raw byte image to standard output.
//!
//! ## `smolisa-emu`
//!
//! Loads a byte image into bank 0, resets the register file and boots the
//! dispatch loop.

pub mod assembler;
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod instruction;
pub mod mmu;
pub mod symbol_table;

/// An 8-bit architectural value.
pub type Byte = u8;

/// A 16-bit architectural value, stored little-endian in memory.
pub type Word = u16;
