//! # Output Writer
//!
//! Emits the `.ob`/`.ent`/`.ext` files for one assembled translation
//! unit (spec.md §4.9/§6), grounded in `original_source/second_pass.c`'s
//! `write_object_file`/`write_entries_file`/`write_externals_file` but
//! following spec.md's exact formatting (a two-space-prefixed header,
//! one `.ext` line per usage site rather than per symbol).

use std::fs;
use std::io;
use std::path::Path;

use crate::first_pass::FirstPassResult;
use crate::second_pass::SecondPassResult;

pub fn write_outputs(basename: &Path, first: &FirstPassResult, second: &SecondPassResult) -> io::Result<()> {
    write_object_file(basename, first, second)?;
    write_entries_file(basename, first)?;
    write_externals_file(basename, second)?;
    Ok(())
}

fn write_object_file(basename: &Path, first: &FirstPassResult, second: &SecondPassResult) -> io::Result<()> {
    let mut body = format!("  {} {}\n", first.code.len(), first.data.len());

    let mut address = 100u32;
    for word in second.code.iter().chain(first.data.iter()) {
        body.push_str(&format!("{address:04} {:05o}\n", word & 0x7FFF));
        address += 1;
    }

    fs::write(basename.with_extension("ob"), body)
}

fn write_entries_file(basename: &Path, first: &FirstPassResult) -> io::Result<()> {
    let mut entries = first.symbol_table.entry_symbols().peekable();
    if entries.peek().is_none() {
        return Ok(());
    }
    let mut body = String::new();
    for entry in entries {
        body.push_str(&format!("{} {:04}\n", entry.name, entry.address));
    }
    fs::write(basename.with_extension("ent"), body)
}

fn write_externals_file(basename: &Path, second: &SecondPassResult) -> io::Result<()> {
    if second.extern_uses.is_empty() {
        return Ok(());
    }
    let mut body = String::new();
    for (name, address) in &second.extern_uses {
        body.push_str(&format!("{name} {address:04}\n"));
    }
    fs::write(basename.with_extension("ext"), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorJournal;
    use crate::first_pass::first_pass;
    use crate::parser::parse_source;
    use crate::second_pass::second_pass;

    fn assemble(source: &str) -> (FirstPassResult, SecondPassResult) {
        let parsed = parse_source(source, "a.as");
        let mut errors = ErrorJournal::new();
        let first = first_pass(&parsed.lines, "a.as", &mut errors);
        let second = second_pass(&first, "a.as", &mut errors);
        assert!(!errors.any());
        (first, second)
    }

    #[test]
    fn object_header_has_two_leading_spaces() {
        let (first, second) = assemble("MAIN: mov #3, r2\n      stop\n");
        let tmp = std::env::temp_dir().join(format!("writer-test-{}", std::process::id()));
        write_object_file(&tmp, &first, &second).unwrap();
        let body = fs::read_to_string(tmp.with_extension("ob")).unwrap();
        assert!(body.starts_with("  3 0\n"));
        let _ = fs::remove_file(tmp.with_extension("ob"));
    }

    #[test]
    fn entries_file_is_skipped_when_no_entries_exist() {
        let (first, _) = assemble("stop\n");
        let tmp = std::env::temp_dir().join(format!("writer-test-ent-{}", std::process::id()));
        write_entries_file(&tmp, &first).unwrap();
        assert!(!tmp.with_extension("ent").exists());
    }

    #[test]
    fn externals_file_has_one_line_per_usage_site() {
        let (_, second) = assemble("      .extern K\n      jmp K\n      jmp K\n      stop\n");
        let tmp = std::env::temp_dir().join(format!("writer-test-ext-{}", std::process::id()));
        write_externals_file(&tmp, &second).unwrap();
        let body = fs::read_to_string(tmp.with_extension("ext")).unwrap();
        assert_eq!(body.lines().count(), 2);
        let _ = fs::remove_file(tmp.with_extension("ext"));
    }
}
