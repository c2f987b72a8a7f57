//! # Second Pass
//!
//! Resolves every fixup recorded during the first pass against the now-
//! complete symbol table: an internal label becomes a Relocatable
//! address word, an external label becomes an External word whose usage
//! site is recorded (spec.md §4.8). Fixups were appended in increasing
//! address order during the first pass, so walking them in order
//! already satisfies the "one `.ext` line per usage site, in order of
//! occurrence" guarantee from spec.md §5/§6.

use crate::encoder;
use crate::error::{AsmError, ErrorJournal, ErrorKind};
use crate::first_pass::FirstPassResult;
use crate::symbol_table::SymbolKind;

pub struct SecondPassResult {
    pub code: Vec<u16>,
    /// `(label, address)` in the order the references occur.
    pub extern_uses: Vec<(String, u16)>,
}

pub fn second_pass(first_pass: &FirstPassResult, file: &str, errors: &mut ErrorJournal) -> SecondPassResult {
    let mut code = first_pass.code.clone();
    let mut extern_uses = Vec::new();

    for fixup in &first_pass.fixups {
        let offset = (fixup.address - 100) as usize;
        match first_pass.symbol_table.lookup(&fixup.label) {
            Some(entry) if entry.kind == SymbolKind::External => {
                code[offset] = encoder::encode_direct_external();
                extern_uses.push((fixup.label.clone(), fixup.address));
            }
            Some(entry) => {
                code[offset] = encoder::encode_direct_resolved(entry.address);
            }
            None => {
                errors.record(AsmError::new(
                    ErrorKind::UndefinedLabel,
                    file,
                    fixup.line,
                    format!("'{}' is never defined", fixup.label),
                ));
            }
        }
    }

    SecondPassResult { code, extern_uses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorJournal;
    use crate::first_pass::first_pass;
    use crate::parser::parse_source;

    fn run(source: &str) -> (SecondPassResult, ErrorJournal) {
        let parsed = parse_source(source, "a.as");
        let mut errors = ErrorJournal::new();
        let first = first_pass(&parsed.lines, "a.as", &mut errors);
        let second = second_pass(&first, "a.as", &mut errors);
        (second, errors)
    }

    #[test]
    fn resolves_internal_label_to_relocatable_address() {
        let (result, errors) = run("      jmp L\nL:    stop\n");
        assert!(!errors.any());
        assert_eq!(encoder::are_of(result.code[1]), encoder::Are::Relocatable);
        assert_eq!((result.code[1] >> 3) & 0x0FFF, 101);
    }

    #[test]
    fn resolves_external_label_and_records_usage_site() {
        let (result, errors) = run("      .extern K\n      jmp K\n      stop\n");
        assert!(!errors.any());
        assert_eq!(encoder::are_of(result.code[1]), encoder::Are::External);
        assert_eq!(result.extern_uses, vec![("K".to_string(), 101)]);
    }

    #[test]
    fn unresolved_label_is_undefined() {
        let (_, errors) = run("      jmp GHOST\n      stop\n");
        assert!(errors.any());
        assert_eq!(errors.iter().next().unwrap().kind, crate::error::ErrorKind::UndefinedLabel);
    }

    #[test]
    fn no_fixups_means_no_extern_uses() {
        let (result, errors) = run("      mov r1, r2\n      stop\n");
        assert!(!errors.any());
        assert!(result.extern_uses.is_empty());
    }
}
