//! # Driver
//!
//! Per-file pipeline orchestration (spec.md §4.10): each input gets a
//! fresh `ErrorJournal` and memory image, matching
//! `original_source/main.c`'s per-file `safe_fopen`/`free_symbol_table`/
//! `free_memory` lifecycle, expressed here as plain values that simply
//! go out of scope when `assemble_file` returns (SPEC_FULL.md §10).

use std::fs;
use std::path::Path;

use crate::error::{AsmError, ErrorJournal, ErrorKind};
use crate::first_pass::first_pass;
use crate::macros;
use crate::parser::parse_source;
use crate::second_pass::second_pass;
use crate::writer::write_outputs;

/// Assemble one `.as` file, writing its `.am`/`.ob`/`.ent`/`.ext`
/// outputs. Returns `true` if the file produced no diagnostics.
pub fn assemble_file(path: &Path) -> bool {
    let file = path.display().to_string();
    let mut errors = ErrorJournal::new();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            errors.record(AsmError::new(ErrorKind::FileNotFound, &file, 0, err.to_string()));
            errors.print();
            return false;
        }
    };

    let expanded = macros::expand(&source, &file, &mut errors);
    let _ = fs::write(path.with_extension("am"), &expanded);

    let parsed = parse_source(&expanded, &file);
    for err in parsed.errors {
        errors.record(err);
    }

    let first = first_pass(&parsed.lines, &file, &mut errors);
    let second = second_pass(&first, &file, &mut errors);

    if errors.any() {
        errors.print();
        return false;
    }

    if let Err(err) = write_outputs(&path.with_extension(""), &first, &second) {
        errors.record(AsmError::new(ErrorKind::FileNotFound, &file, 0, err.to_string()));
        errors.print();
        return false;
    }

    true
}

/// Assemble every file in `paths`. Returns `true` iff all of them
/// assembled cleanly.
pub fn assemble_all<P: AsRef<Path>>(paths: &[P]) -> bool {
    let mut all_ok = true;
    for path in paths {
        if !assemble_file(path.as_ref()) {
            all_ok = false;
        }
    }
    all_ok
}
