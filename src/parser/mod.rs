//! # Parser
//!
//! Turns macro-expanded source text into a `Vec<SourceLine>`: one entry
//! per non-blank, non-comment line, with its optional label stripped off
//! and its remainder classified as an instruction or a directive.
//! Operand classification (`crate::operand`) and addressing-mode/arity
//! validation (`crate::validator`) both happen here, at parse time,
//! mirroring the teacher's own lexer→parser split collapsed into a
//! single line-oriented pass, since this grammar has no need for a
//! separate character-level tokenizer.

pub mod ast;


use crate::error::{AsmError, ErrorKind};
use crate::operand::{classify_operand, AddressingMode};
use crate::validator::{is_valid_label, label_error_kind, mode_allowed, OpCode};
use ast::{LineContent, SourceLine};

pub struct ParseResult {
    pub lines: Vec<SourceLine>,
    pub errors: Vec<AsmError>,
}

pub fn parse_source(source: &str, file: &str) -> ParseResult {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_number = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        let (label, rest) = split_label(trimmed);

        match parse_content(rest, file, line_number) {
            Ok(content) => lines.push(SourceLine { label: label.map(str::to_string), content, line_number }),
            Err(err) => errors.push(err),
        }
    }

    ParseResult { lines, errors }
}

/// Split `"LABEL: rest"` into `(Some("LABEL"), "rest")`. The label text
/// is returned unvalidated — the first pass checks its syntax, since
/// that is where `InvalidLabel`/`ReservedWordAsLabel` are raised
/// (spec.md §4.7 step 1).
fn split_label(line: &str) -> (Option<&str>, &str) {
    if let Some(idx) = line.find(':') {
        let before = &line[..idx];
        if !before.is_empty() && !before.contains(char::is_whitespace) {
            return (Some(before), line[idx + 1..].trim_start());
        }
    }
    (None, line)
}

fn parse_content(rest: &str, file: &str, line: usize) -> Result<LineContent, AsmError> {
    if let Some(arg) = rest.strip_prefix(".data") {
        return parse_data(arg, file, line);
    }
    if let Some(arg) = rest.strip_prefix(".string") {
        return parse_string(arg, file, line);
    }
    if let Some(arg) = rest.strip_prefix(".entry") {
        return parse_label_arg(arg, file, line).map(LineContent::Entry);
    }
    if let Some(arg) = rest.strip_prefix(".extern") {
        return parse_label_arg(arg, file, line).map(LineContent::Extern);
    }
    if rest.starts_with('.') {
        return Err(AsmError::new(
            ErrorKind::InvalidInstruction,
            file,
            line,
            format!("unknown directive in '{rest}'"),
        ));
    }
    parse_instruction(rest, file, line)
}

fn parse_label_arg(arg: &str, file: &str, line: usize) -> Result<String, AsmError> {
    let name = arg.trim();
    if name.is_empty() || name.split_whitespace().count() != 1 {
        return Err(AsmError::new(
            ErrorKind::InvalidInstruction,
            file,
            line,
            "expected exactly one label name",
        ));
    }
    Ok(name.to_string())
}

fn parse_data(arg: &str, file: &str, line: usize) -> Result<LineContent, AsmError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(AsmError::new(ErrorKind::InvalidOperand, file, line, "'.data' needs at least one value"));
    }
    if arg.ends_with(',') {
        return Err(AsmError::new(ErrorKind::InvalidOperand, file, line, "'.data' has a trailing comma"));
    }
    let mut values = Vec::new();
    for field in arg.split(',') {
        let field = field.trim();
        if field.is_empty() {
            return Err(AsmError::new(ErrorKind::InvalidOperand, file, line, "empty value in '.data' list"));
        }
        let value: i32 = field.parse().map_err(|_| {
            AsmError::new(ErrorKind::InvalidOperand, file, line, format!("'{field}' is not an integer"))
        })?;
        if !(-16384..=16383).contains(&value) {
            return Err(AsmError::new(
                ErrorKind::InvalidOperand,
                file,
                line,
                format!("'{value}' does not fit in a 15-bit word"),
            ));
        }
        values.push(value as i16);
    }
    Ok(LineContent::Data(values))
}

fn parse_string(arg: &str, file: &str, line: usize) -> Result<LineContent, AsmError> {
    let arg = arg.trim();
    let inner = arg
        .strip_prefix('"')
        .ok_or_else(|| AsmError::new(ErrorKind::InvalidOperand, file, line, "'.string' must start with '\"'"))?;
    let closing = inner.find('"').ok_or_else(|| {
        AsmError::new(ErrorKind::InvalidOperand, file, line, "'.string' is missing its closing '\"'")
    })?;
    let text = &inner[..closing];
    if !text.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Err(AsmError::new(
            ErrorKind::InvalidOperand,
            file,
            line,
            "'.string' contents must be printable ASCII",
        ));
    }
    if !inner[closing + 1..].trim().is_empty() {
        return Err(AsmError::new(
            ErrorKind::InvalidOperand,
            file,
            line,
            "unexpected text after closing '\"' in '.string'",
        ));
    }
    Ok(LineContent::Str(text.to_string()))
}

fn parse_instruction(rest: &str, file: &str, line: usize) -> Result<LineContent, AsmError> {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let mnemonic = parts.next().unwrap_or("").trim();
    let operand_text = parts.next().unwrap_or("").trim();

    let opcode = OpCode::from_mnemonic(mnemonic).ok_or_else(|| {
        AsmError::new(ErrorKind::InvalidInstruction, file, line, format!("'{mnemonic}' is not an instruction"))
    })?;

    let operand_strs: Vec<&str> = if operand_text.is_empty() {
        Vec::new()
    } else {
        if operand_text.ends_with(',') {
            return Err(AsmError::new(
                ErrorKind::InvalidOperand,
                file,
                line,
                "trailing comma in operand list",
            ));
        }
        operand_text.split(',').map(str::trim).collect()
    };

    let expected = opcode.operand_count();
    if operand_strs.len() != expected {
        return Err(AsmError::new(
            ErrorKind::InvalidInstruction,
            file,
            line,
            format!(
                "'{mnemonic}' expects {expected} operand(s), found {}",
                operand_strs.len()
            ),
        ));
    }

    let modes: Vec<AddressingMode> = operand_strs
        .iter()
        .map(|text| classify_operand(text, file, line))
        .collect::<Result<_, _>>()?;

    let (src, dst) = match modes.len() {
        0 => (AddressingMode::None, AddressingMode::None),
        1 => (AddressingMode::None, modes.into_iter().next().unwrap()),
        _ => {
            let mut it = modes.into_iter();
            (it.next().unwrap(), it.next().unwrap())
        }
    };

    if !mode_allowed(opcode.src_mask(), src.clone()) {
        return Err(AsmError::new(
            ErrorKind::InvalidOperand,
            file,
            line,
            format!("'{mnemonic}' does not permit this source addressing mode"),
        ));
    }
    if !mode_allowed(opcode.dst_mask(), dst.clone()) {
        return Err(AsmError::new(
            ErrorKind::InvalidOperand,
            file,
            line,
            format!("'{mnemonic}' does not permit this destination addressing mode"),
        ));
    }

    if let AddressingMode::Direct(name) = &src {
        check_label_syntax(name, file, line)?;
    }
    if let AddressingMode::Direct(name) = &dst {
        check_label_syntax(name, file, line)?;
    }

    Ok(LineContent::Instruction { opcode, src, dst })
}

fn check_label_syntax(name: &str, file: &str, line: usize) -> Result<(), AsmError> {
    if is_valid_label(name) {
        return Ok(());
    }
    Err(AsmError::new(
        label_error_kind(name),
        file,
        line,
        format!("'{name}' is not usable as a label"),
    ))
}
