//! # Error Journal
//!
//! An append-only, ordered record of diagnostics produced while assembling
//! one translation unit. Recording never aborts the pipeline: a stage logs
//! a problem and moves on to the next line so a single bad statement never
//! hides everything that comes after it (spec.md §7).

use std::fmt;

/// The closed set of diagnostic kinds this assembler can report.
///
/// Closed deliberately: every stage maps whatever it sees onto one of
/// these, rather than growing its own kind as new failure modes are
/// found. `MemoryAllocation` has no call site in this crate — `Vec`/
/// `String` allocation failure aborts the process rather than returning
/// an error — but the variant is kept for parity with the original
/// design's closed error-kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Macro,
    InvalidLabel,
    InvalidInstruction,
    InvalidMacroDefinition,
    DuplicateLabel,
    EntryExternConflict,
    SymbolConflict,
    ReservedWordAsLabel,
    UndefinedLabel,
    InvalidOperand,
    FileNotFound,
    MemoryAllocation,
}

impl ErrorKind {
    fn prefix(self) -> &'static str {
        match self {
            ErrorKind::Macro => "macro",
            ErrorKind::InvalidLabel => "invalid-label",
            ErrorKind::InvalidInstruction => "invalid-instruction",
            ErrorKind::InvalidMacroDefinition => "invalid-macro-definition",
            ErrorKind::DuplicateLabel => "duplicate-label",
            ErrorKind::EntryExternConflict => "entry-extern-conflict",
            ErrorKind::SymbolConflict => "symbol-conflict",
            ErrorKind::ReservedWordAsLabel => "reserved-word-as-label",
            ErrorKind::UndefinedLabel => "undefined-label",
            ErrorKind::InvalidOperand => "invalid-operand",
            ErrorKind::FileNotFound => "file-not-found",
            ErrorKind::MemoryAllocation => "memory-allocation",
        }
    }
}

/// One reported diagnostic: what went wrong, where, and in which file.
///
/// `line` is 1-indexed, matching the source text a user would open in an
/// editor; line 0 means "no specific line" (file-level problems such as
/// `FileNotFound`, or end-of-pipeline checks like a missing `.entry`
/// target that have no single originating line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    pub kind: ErrorKind,
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl AsmError {
    pub fn new(
        kind: ErrorKind,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self { kind, file: file.into(), line, message: message.into() }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}:{})", self.kind.prefix(), self.message, self.file, self.line)
    }
}

/// Append-only ordered list of diagnostics for one translation unit.
///
/// Mirrors the original design's linked list of errors, but as a plain
/// `Vec` threaded explicitly through the pipeline instead of a global —
/// see Design Notes in spec.md §9 ("Global mutable tables").
#[derive(Debug, Default)]
pub struct ErrorJournal {
    errors: Vec<AsmError>,
}

impl ErrorJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Never fails; callers keep going afterward.
    pub fn record(&mut self, error: AsmError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn any(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AsmError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Print every diagnostic to stderr, in the order they were recorded.
    pub fn print(&self) {
        for error in &self.errors {
            eprintln!("{error}");
        }
    }

    pub fn into_errors(self) -> Vec<AsmError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_kind_prefix_message_file_line_form() {
        let err = AsmError::new(ErrorKind::DuplicateLabel, "prog.as", 4, "label 'LOOP' already defined");
        assert_eq!(format!("{err}"), "duplicate-label: label 'LOOP' already defined (prog.as:4)");
    }

    #[test]
    fn journal_preserves_recording_order() {
        let mut journal = ErrorJournal::new();
        assert!(!journal.any());
        journal.record(AsmError::new(ErrorKind::Macro, "a.as", 1, "first"));
        journal.record(AsmError::new(ErrorKind::InvalidOperand, "a.as", 2, "second"));
        assert!(journal.any());
        let messages: Vec<_> = journal.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
