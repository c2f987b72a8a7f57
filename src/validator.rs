//! # Instruction Validator
//!
//! The opcode table: sixteen mnemonics, each with a permitted-addressing-
//! mode bitmap per operand side (spec.md §4.5). Also centralizes the
//! reserved-word and label-syntax rules that both the macro pre-pass and
//! the first pass need, rather than scattering them across separate
//! files the way `original_source/errors.c`, `macros.c`, and
//! `operand_validation.c` each reimplement a piece of the same check.

use crate::operand::AddressingMode;

/// One of the sixteen instruction mnemonics, in opcode order 0–15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Red,
    Prn,
    Jsr,
    Rts,
    Stop,
}

impl OpCode {
    pub fn value(self) -> u16 {
        self as u16
    }

    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Some(match name {
            "mov" => OpCode::Mov,
            "cmp" => OpCode::Cmp,
            "add" => OpCode::Add,
            "sub" => OpCode::Sub,
            "lea" => OpCode::Lea,
            "clr" => OpCode::Clr,
            "not" => OpCode::Not,
            "inc" => OpCode::Inc,
            "dec" => OpCode::Dec,
            "jmp" => OpCode::Jmp,
            "bne" => OpCode::Bne,
            "red" => OpCode::Red,
            "prn" => OpCode::Prn,
            "jsr" => OpCode::Jsr,
            "rts" => OpCode::Rts,
            "stop" => OpCode::Stop,
            _ => return None,
        })
    }

    /// 4-bit one-hot-checkable bitmap of addressing modes legal on the
    /// source side; bit *k* set means mode *k* is permitted (Immediate=0,
    /// Direct=1, Index=2, Register=3). `0b0000` means "no source operand".
    pub fn src_mask(self) -> u8 {
        match self {
            OpCode::Mov | OpCode::Add | OpCode::Sub | OpCode::Cmp => 0b1111,
            OpCode::Lea => 0b0010,
            _ => 0b0000,
        }
    }

    /// Same shape as `src_mask`, for the destination side. `0b0000`
    /// means the opcode takes no operands at all.
    pub fn dst_mask(self) -> u8 {
        match self {
            OpCode::Mov | OpCode::Add | OpCode::Sub => 0b1110,
            OpCode::Cmp => 0b1111,
            OpCode::Lea | OpCode::Clr | OpCode::Not | OpCode::Inc | OpCode::Dec | OpCode::Red => {
                0b1110
            }
            OpCode::Jmp | OpCode::Bne | OpCode::Jsr => 0b0110,
            OpCode::Prn => 0b1111,
            OpCode::Rts | OpCode::Stop => 0b0000,
        }
    }

    /// How many operands this opcode expects, derived from its masks.
    pub fn operand_count(self) -> usize {
        if self.dst_mask() == 0 {
            0
        } else if self.src_mask() == 0 {
            1
        } else {
            2
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Mov => "mov",
            OpCode::Cmp => "cmp",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Lea => "lea",
            OpCode::Clr => "clr",
            OpCode::Not => "not",
            OpCode::Inc => "inc",
            OpCode::Dec => "dec",
            OpCode::Jmp => "jmp",
            OpCode::Bne => "bne",
            OpCode::Red => "red",
            OpCode::Prn => "prn",
            OpCode::Jsr => "jsr",
            OpCode::Rts => "rts",
            OpCode::Stop => "stop",
        }
    }
}

fn mode_bit(mode: AddressingMode) -> u8 {
    match mode {
        AddressingMode::Immediate(_) => 0,
        AddressingMode::Direct(_) => 1,
        AddressingMode::Index(_) => 2,
        AddressingMode::Register(_) => 3,
        AddressingMode::None => return 0,
    }
}

/// Is `mode` legal for `opcode` on the given side? `mode == None` is
/// legal exactly when `mask == 0` (the side expects no operand).
pub fn mode_allowed(mask: u8, mode: AddressingMode) -> bool {
    if matches!(mode, AddressingMode::None) {
        return mask == 0;
    }
    mask & (1 << mode_bit(mode)) != 0
}

const DIRECTIVES: &[&str] = &[".data", ".string", ".entry", ".extern"];

/// Reserved words a label (or macro name) may never equal: every opcode
/// mnemonic, every directive keyword, and `rN` for N in 0..=7 (the
/// register syntax would otherwise be ambiguous with a label reference).
pub fn is_reserved_word(word: &str) -> bool {
    if OpCode::from_mnemonic(word).is_some() {
        return true;
    }
    if DIRECTIVES.contains(&word) {
        return true;
    }
    if let Some(digit) = word.strip_prefix('r') {
        if digit.len() == 1 && matches!(digit, "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7") {
            return true;
        }
    }
    matches!(word, "macr" | "endmacr")
}

/// Which diagnostic kind applies to a rejected label: `ReservedWordAsLabel`
/// if the name collides with a mnemonic/directive/register spelling,
/// `InvalidLabel` for any other syntax violation. Only meaningful when
/// `is_valid_label(name)` is `false`.
pub fn label_error_kind(name: &str) -> crate::error::ErrorKind {
    if is_reserved_word(name) {
        crate::error::ErrorKind::ReservedWordAsLabel
    } else {
        crate::error::ErrorKind::InvalidLabel
    }
}

/// `[A-Za-z][A-Za-z0-9]{0,30}` — a leading letter followed by up to 30
/// further letters/digits (31 characters total), and not a reserved word.
pub fn is_valid_label(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if name.len() > 31 || !chars.as_str().chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    !is_reserved_word(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_arity_matches_table() {
        assert_eq!(OpCode::Mov.operand_count(), 2);
        assert_eq!(OpCode::Clr.operand_count(), 1);
        assert_eq!(OpCode::Stop.operand_count(), 0);
    }

    #[test]
    fn mode_allowed_rejects_disallowed_destination() {
        assert!(!mode_allowed(OpCode::Lea.src_mask(), AddressingMode::Register(1)));
        assert!(mode_allowed(OpCode::Lea.src_mask(), AddressingMode::Direct("X".into())));
    }

    #[test]
    fn none_mode_legal_only_with_zero_mask() {
        assert!(mode_allowed(0, AddressingMode::None));
        assert!(!mode_allowed(0b0110, AddressingMode::None));
    }

    #[test]
    fn labels_31_chars_accepted_32_rejected() {
        let ok: String = std::iter::once('A').chain(std::iter::repeat('x').take(30)).collect();
        let too_long: String = std::iter::once('A').chain(std::iter::repeat('x').take(31)).collect();
        assert_eq!(ok.len(), 31);
        assert!(is_valid_label(&ok));
        assert!(!is_valid_label(&too_long));
    }

    #[test]
    fn reserved_words_rejected_as_labels() {
        assert!(!is_valid_label("mov"));
        assert!(!is_valid_label("r7"));
        assert!(!is_valid_label(".data"));
        assert!(is_valid_label("r8")); // not a register spelling, r0..r7 only... see note below
    }
}
