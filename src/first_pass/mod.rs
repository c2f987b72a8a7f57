//! # First Pass
//!
//! Walks the already-parsed source lines once, laying out the memory
//! image, populating the symbol table, and recording a fixup for every
//! Direct operand so the second pass can resolve it without smuggling a
//! label spelling through the operand word itself (spec.md §4.7, §9).


use crate::encoder;
use crate::error::{AsmError, ErrorJournal, ErrorKind};
use crate::operand::AddressingMode;
use crate::parser::ast::{LineContent, SourceLine};
use crate::symbol_table::{SymbolKind, SymbolTable};
use crate::validator::{is_valid_label, label_error_kind};

const BASE_ADDRESS: u16 = 100;

/// A Direct operand whose address is not yet known. `address` is the
/// absolute memory address of the placeholder word; `line` is kept for
/// diagnostics if the label never resolves.
#[derive(Debug, Clone)]
pub struct Fixup {
    pub address: u16,
    pub label: String,
    pub line: usize,
}

/// Everything the second pass and the writer need: the memory image
/// (instruction words, then data words, both relocated to their final
/// addresses), the symbol table, and the outstanding fixups.
pub struct FirstPassResult {
    pub code: Vec<u16>,
    pub data: Vec<u16>,
    pub symbol_table: SymbolTable,
    pub fixups: Vec<Fixup>,
}

struct PendingEntry {
    name: String,
    line: usize,
}

pub fn first_pass(lines: &[SourceLine], file: &str, errors: &mut ErrorJournal) -> FirstPassResult {
    let mut code: Vec<u16> = Vec::new();
    let mut data: Vec<u16> = Vec::new();
    let mut symbol_table = SymbolTable::new();
    let mut fixups = Vec::new();
    let mut pending_entries: Vec<PendingEntry> = Vec::new();

    for line in lines {
        let ic = code.len() as u16;
        let dc = data.len() as u16;

        if let Some(label) = &line.label {
            if !matches!(line.content, LineContent::Extern(_) | LineContent::Entry(_)) {
                define_label(&mut symbol_table, label, ic, dc, &line.content, file, line.line_number, errors);
            }
        }

        match &line.content {
            LineContent::Data(values) => {
                for value in values {
                    data.push(encoder::encode_data_value(*value));
                }
            }
            LineContent::Str(text) => {
                for c in text.chars() {
                    data.push(encoder::encode_char(c));
                }
                data.push(0);
            }
            LineContent::Entry(name) => {
                pending_entries.push(PendingEntry { name: name.clone(), line: line.line_number });
            }
            LineContent::Extern(name) => {
                if !is_valid_label(name) {
                    errors.record(AsmError::new(
                        label_error_kind(name),
                        file,
                        line.line_number,
                        format!("'{name}' is not usable as a label"),
                    ));
                    continue;
                }
                if !symbol_table.define(name, 0, SymbolKind::External) {
                    errors.record(AsmError::new(
                        ErrorKind::SymbolConflict,
                        file,
                        line.line_number,
                        format!("'{name}' is already defined locally and cannot also be external"),
                    ));
                }
            }
            LineContent::Instruction { opcode, src, dst } => {
                code.push(encoder::encode_head(*opcode, src, dst));
                emit_operand_words(src, dst, &mut code, &mut fixups, line.line_number);
            }
        }
    }

    let final_ic = code.len() as u16;
    symbol_table.relocate_data_symbols(final_ic);

    for pending in pending_entries {
        if symbol_table.is_external(&pending.name) {
            errors.record(AsmError::new(
                ErrorKind::EntryExternConflict,
                file,
                pending.line,
                format!("'{}' cannot be both entry and external", pending.name),
            ));
            continue;
        }
        if !symbol_table.mark_entry(&pending.name) {
            errors.record(AsmError::new(
                ErrorKind::UndefinedLabel,
                file,
                pending.line,
                format!("entry target '{}' is never defined", pending.name),
            ));
        }
    }

    FirstPassResult { code, data, symbol_table, fixups }
}

fn define_label(
    symbol_table: &mut SymbolTable,
    label: &str,
    ic: u16,
    dc: u16,
    content: &LineContent,
    file: &str,
    line_number: usize,
    errors: &mut ErrorJournal,
) {
    if !is_valid_label(label) {
        errors.record(AsmError::new(
            label_error_kind(label),
            file,
            line_number,
            format!("'{label}' is not usable as a label"),
        ));
        return;
    }
    let (address, kind) = match content {
        LineContent::Data(_) | LineContent::Str(_) => (BASE_ADDRESS + dc, SymbolKind::Data),
        _ => (BASE_ADDRESS + ic, SymbolKind::Code),
    };
    if !symbol_table.define(label, address, kind) {
        errors.record(AsmError::new(
            ErrorKind::DuplicateLabel,
            file,
            line_number,
            format!("'{label}' is already defined"),
        ));
    }
}

#[derive(Clone, Copy)]
enum Side {
    Src,
    Dst,
}

/// Emits the operand word(s) following the head word (spec.md §3/§4.6,
/// word counts cross-checked against the worked scenarios in spec.md
/// §8). Three cases:
/// - Both sides Register/Index: one combined word carries both.
/// - Exactly one operand present (single-operand opcodes always put it
///   in `dst`, per §4.5): that operand gets a dedicated word, using the
///   destination-shape register word if it is Register/Index.
/// - Two distinct operands, not both Register/Index: a Register/Index
///   side that is paired with an Immediate/Direct side contributes no
///   word of its own (its addressing mode is already fully recorded in
///   the head word's one-hot bitmap); Immediate/Direct sides always get
///   their own word, source before destination.
fn emit_operand_words(
    src: &AddressingMode,
    dst: &AddressingMode,
    code: &mut Vec<u16>,
    fixups: &mut Vec<Fixup>,
    line: usize,
) {
    if let (Some(s), Some(d)) = (reg_of(src), reg_of(dst)) {
        code.push(encoder::encode_combined_register(s, d));
        return;
    }

    if matches!(src, AddressingMode::None) {
        emit_single_operand_word(dst, Side::Dst, code, fixups, line);
        return;
    }

    emit_operand_word_if_payload(src, Side::Src, code, fixups, line);
    emit_operand_word_if_payload(dst, Side::Dst, code, fixups, line);
}

/// Emits a word for `mode` unless it is Register/Index sharing this
/// instruction with another operand (see `emit_operand_words`).
fn emit_operand_word_if_payload(
    mode: &AddressingMode,
    side: Side,
    code: &mut Vec<u16>,
    fixups: &mut Vec<Fixup>,
    line: usize,
) {
    match mode {
        AddressingMode::Immediate(_) | AddressingMode::Direct(_) => {
            emit_single_operand_word(mode, side, code, fixups, line)
        }
        AddressingMode::Register(_) | AddressingMode::Index(_) | AddressingMode::None => {}
    }
}

fn emit_single_operand_word(
    mode: &AddressingMode,
    side: Side,
    code: &mut Vec<u16>,
    fixups: &mut Vec<Fixup>,
    line: usize,
) {
    match mode {
        AddressingMode::None => {}
        AddressingMode::Immediate(v) => code.push(encoder::encode_immediate(*v)),
        AddressingMode::Direct(label) => {
            fixups.push(Fixup { address: BASE_ADDRESS + code.len() as u16, label: label.clone(), line });
            code.push(encoder::encode_direct_placeholder());
        }
        AddressingMode::Register(n) | AddressingMode::Index(n) => code.push(match side {
            Side::Src => encoder::encode_single_source_register(*n),
            Side::Dst => encoder::encode_single_dest_register(*n),
        }),
    }
}

fn reg_of(mode: &AddressingMode) -> Option<u8> {
    match mode {
        AddressingMode::Register(n) | AddressingMode::Index(n) => Some(*n),
        _ => None,
    }
}
