//! # Source Line AST
//!
//! A program is a sequence of [`SourceLine`]s, one per non-blank,
//! non-comment input line, each carrying an optional label and its
//! content. The AST stays close to the surface syntax — directives and
//! instructions are not rewritten into some other form — since the
//! first pass consumes each line exactly once and has no need for a
//! nested expression tree.

use crate::operand::AddressingMode;
use crate::validator::OpCode;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub label: Option<String>,
    pub content: LineContent,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    Instruction { opcode: OpCode, src: AddressingMode, dst: AddressingMode },
    Data(Vec<i16>),
    Str(String),
    Entry(String),
    Extern(String),
}
