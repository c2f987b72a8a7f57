//! # Operand Lexer / Classifier
//!
//! Parses one trimmed operand string into an [`AddressingMode`]. This is
//! a pure, stateless classifier — no lookup against the symbol table
//! happens here; a `Direct` operand is resolved later, in the second
//! pass (spec.md §4.4/§4.8).

use crate::error::{AsmError, ErrorKind};
use crate::validator::is_valid_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate(i16),
    Direct(String),
    Index(u8),
    Register(u8),
    None,
}

impl AddressingMode {
    /// The one-hot bit position used in the instruction head word and in
    /// the validator's addressing-mode bitmaps.
    pub fn bit(&self) -> Option<u8> {
        match self {
            AddressingMode::Immediate(_) => Some(0),
            AddressingMode::Direct(_) => Some(1),
            AddressingMode::Index(_) => Some(2),
            AddressingMode::Register(_) => Some(3),
            AddressingMode::None => None,
        }
    }
}

const IMMEDIATE_MIN: i32 = -2048;
const IMMEDIATE_MAX: i32 = 2047;

/// Classify a single operand string. `file`/`line` are only used to
/// stamp a diagnostic if the operand is malformed.
pub fn classify_operand(
    text: &str,
    file: &str,
    line: usize,
) -> Result<AddressingMode, AsmError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(AddressingMode::None);
    }

    if let Some(rest) = text.strip_prefix('#') {
        let value: i32 = rest.parse().map_err(|_| {
            AsmError::new(
                ErrorKind::InvalidOperand,
                file,
                line,
                format!("'{text}' is not a valid immediate value"),
            )
        })?;
        if !(IMMEDIATE_MIN..=IMMEDIATE_MAX).contains(&value) {
            return Err(AsmError::new(
                ErrorKind::InvalidOperand,
                file,
                line,
                format!("immediate value {value} out of range [{IMMEDIATE_MIN}, {IMMEDIATE_MAX}]"),
            ));
        }
        return Ok(AddressingMode::Immediate(value as i16));
    }

    if let Some(rest) = text.strip_prefix('*') {
        return parse_register(rest, file, line)
            .map(AddressingMode::Index)
            .map_err(|mut e| {
                e.message = format!("'{text}' is not a valid index operand: {}", e.message);
                e
            });
    }

    if let Ok(reg) = parse_register(text, file, line) {
        return Ok(AddressingMode::Register(reg));
    }

    if is_valid_label(text) {
        return Ok(AddressingMode::Direct(text.to_string()));
    }

    Err(AsmError::new(
        ErrorKind::InvalidOperand,
        file,
        line,
        format!("'{text}' is not a valid operand"),
    ))
}

fn parse_register(text: &str, file: &str, line: usize) -> Result<u8, AsmError> {
    let invalid = || {
        AsmError::new(ErrorKind::InvalidOperand, file, line, format!("'{text}' is not a valid register"))
    };
    let digit = text.strip_prefix('r').ok_or_else(invalid)?;
    if digit.len() != 1 {
        return Err(invalid());
    }
    let n: u8 = digit.parse().map_err(|_| invalid())?;
    if n > 7 {
        return Err(invalid());
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_mode() {
        assert_eq!(classify_operand("", "a.as", 1).unwrap(), AddressingMode::None);
        assert_eq!(classify_operand("#3", "a.as", 1).unwrap(), AddressingMode::Immediate(3));
        assert_eq!(classify_operand("#-1", "a.as", 1).unwrap(), AddressingMode::Immediate(-1));
        assert_eq!(classify_operand("*r2", "a.as", 1).unwrap(), AddressingMode::Index(2));
        assert_eq!(classify_operand("r5", "a.as", 1).unwrap(), AddressingMode::Register(5));
        assert_eq!(
            classify_operand("LIST", "a.as", 1).unwrap(),
            AddressingMode::Direct("LIST".to_string())
        );
    }

    #[test]
    fn immediate_boundary_values() {
        assert!(classify_operand("#2047", "a.as", 1).is_ok());
        assert!(classify_operand("#-2048", "a.as", 1).is_ok());
        assert!(classify_operand("#2048", "a.as", 1).is_err());
        assert!(classify_operand("#-2049", "a.as", 1).is_err());
    }

    #[test]
    fn register_out_of_range_is_rejected() {
        assert!(classify_operand("r8", "a.as", 1).is_err());
        assert!(classify_operand("*r9", "a.as", 1).is_err());
    }

    #[test]
    fn malformed_operand_is_invalid_operand() {
        let err = classify_operand("1label", "a.as", 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOperand);
    }
}
