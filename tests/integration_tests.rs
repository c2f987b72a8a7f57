use std::fs;
use std::path::PathBuf;

use octal_assembler::driver::assemble_file;
use octal_assembler::error::{ErrorJournal, ErrorKind};
use octal_assembler::first_pass::first_pass;
use octal_assembler::parser::parse_source;
use octal_assembler::second_pass::second_pass;

/// Write `source` to a fresh `.as` file under the system temp dir, assemble
/// it through the driver, and return the base path (extension-less) plus
/// whether the run was clean. Every artifact the driver writes
/// (`.am`/`.ob`/`.ent`/`.ext`) is cleaned up by the caller via `cleanup`.
fn assemble(name: &str, source: &str) -> (PathBuf, bool) {
    let base = std::env::temp_dir().join(format!("octal-assembler-it-{}-{name}", std::process::id()));
    let as_path = base.with_extension("as");
    fs::write(&as_path, source).expect("failed to write fixture");
    let ok = assemble_file(&as_path);
    (base, ok)
}

fn cleanup(base: &PathBuf) {
    for ext in ["as", "am", "ob", "ent", "ext"] {
        let _ = fs::remove_file(base.with_extension(ext));
    }
}

fn read_ob(base: &PathBuf) -> String {
    fs::read_to_string(base.with_extension("ob")).expect("missing .ob output")
}

/// Run macro expansion → parse → first pass → second pass in memory and
/// collect every diagnostic kind raised at any stage, without touching disk.
fn collect_all_errors(source: &str) -> Vec<ErrorKind> {
    let mut errors = ErrorJournal::new();
    let expanded = octal_assembler::macros::expand(source, "a.as", &mut errors);
    let parsed = parse_source(&expanded, "a.as");
    for err in parsed.errors {
        errors.record(err);
    }
    let first = first_pass(&parsed.lines, "a.as", &mut errors);
    let _ = second_pass(&first, "a.as", &mut errors);
    errors.iter().map(|e| e.kind).collect()
}

#[test]
fn s1_minimal_program() {
    let (base, ok) = assemble("s1", "MAIN: mov #3, r2\n      stop\n");
    assert!(ok);
    let body = read_ob(&base);
    assert!(body.starts_with("  3 0\n"));
    let first_line = body.lines().nth(1).unwrap();
    assert!(first_line.starts_with("0100 "));
    assert!(!base.with_extension("ent").exists());
    assert!(!base.with_extension("ext").exists());
    cleanup(&base);
}

#[test]
fn s2_data_and_label_reference() {
    let (base, ok) = assemble("s2", "      mov X, r1\n      stop\nX:    .data 7, -1\n");
    assert!(ok);
    let body = read_ob(&base);
    assert!(body.starts_with("  3 2\n"));
    cleanup(&base);
}

#[test]
fn s3_extern() {
    let (base, ok) = assemble("s3", "      .extern K\n      jmp K\n      stop\n");
    assert!(ok);
    let body = read_ob(&base);
    assert!(body.starts_with("  3 0\n"));
    assert!(!base.with_extension("ent").exists());
    let ext = fs::read_to_string(base.with_extension("ext")).unwrap();
    assert_eq!(ext, "K 0101\n");
    cleanup(&base);
}

#[test]
fn s4_entry() {
    let (base, ok) = assemble("s4", "      .entry MAIN\nMAIN: stop\n");
    assert!(ok);
    let body = read_ob(&base);
    assert!(body.starts_with("  1 0\n"));
    let ent = fs::read_to_string(base.with_extension("ent")).unwrap();
    assert_eq!(ent, "MAIN 0100\n");
    cleanup(&base);
}

#[test]
fn s5_register_pairing() {
    let (base, ok) = assemble("s5", "      mov r3, r5\n      stop\n");
    assert!(ok);
    let body = read_ob(&base);
    assert!(body.starts_with("  2 0\n"));
    cleanup(&base);
}

#[test]
fn s6_macro_expansion() {
    let (base, ok) = assemble(
        "s6",
        "      macr greet\n      prn #7\n      endmacr\n      greet\n      greet\n      stop\n",
    );
    assert!(ok);
    let am = fs::read_to_string(base.with_extension("am")).unwrap();
    assert_eq!(am.matches("prn #7").count(), 2);
    assert!(!am.contains("macr"));
    let body = read_ob(&base);
    assert!(body.starts_with("  5 0\n"));
    cleanup(&base);
}

#[test]
fn multiple_files_are_assembled_independently() {
    let a = std::env::temp_dir().join(format!("octal-assembler-it-{}-multi-a", std::process::id()));
    let b = std::env::temp_dir().join(format!("octal-assembler-it-{}-multi-b", std::process::id()));
    fs::write(a.with_extension("as"), "MAIN: mov #3, r2\n      stop\n").unwrap();
    fs::write(b.with_extension("as"), "      .extern K\n      jmp K\n      stop\n").unwrap();

    let paths = [a.with_extension("as"), b.with_extension("as")];
    assert!(octal_assembler::driver::assemble_all(&paths));

    assert!(fs::read_to_string(a.with_extension("ob")).unwrap().starts_with("  3 0\n"));
    assert!(fs::read_to_string(b.with_extension("ext")).unwrap() == "K 0101\n");

    cleanup(&a);
    cleanup(&b);
}

#[test]
fn error_undefined_label() {
    let errors = collect_all_errors("      jmp GHOST\n      stop\n");
    assert!(errors.contains(&ErrorKind::UndefinedLabel), "got: {errors:?}");
}

#[test]
fn error_duplicate_label() {
    let errors = collect_all_errors("FOO:  stop\nFOO:  stop\n");
    assert!(errors.contains(&ErrorKind::DuplicateLabel), "got: {errors:?}");
}

#[test]
fn error_reserved_word_as_label() {
    let errors = collect_all_errors("mov:  stop\n");
    assert!(errors.contains(&ErrorKind::ReservedWordAsLabel), "got: {errors:?}");
}

#[test]
fn error_entry_extern_conflict() {
    let errors = collect_all_errors("      .extern K\n      .entry K\n      jmp K\n      stop\n");
    assert!(errors.contains(&ErrorKind::EntryExternConflict), "got: {errors:?}");
}

#[test]
fn error_disallowed_addressing_mode() {
    let errors = collect_all_errors("      mov r1, #5\n      stop\n");
    assert!(errors.contains(&ErrorKind::InvalidOperand), "got: {errors:?}");
}

#[test]
fn error_immediate_out_of_range() {
    let errors = collect_all_errors("      mov #2048, r1\n      stop\n");
    assert!(errors.contains(&ErrorKind::InvalidOperand), "got: {errors:?}");
}

#[test]
fn error_label_too_long() {
    let errors = collect_all_errors("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA: stop\n");
    assert!(errors.contains(&ErrorKind::InvalidLabel), "got: {errors:?}");
}

#[test]
fn error_data_trailing_comma() {
    let errors = collect_all_errors("X:    .data 1, 2,\n      stop\n");
    assert!(errors.contains(&ErrorKind::InvalidOperand), "got: {errors:?}");
}

#[test]
fn error_string_missing_closing_quote() {
    let errors = collect_all_errors("X:    .string \"abc\n      stop\n");
    assert!(errors.contains(&ErrorKind::InvalidOperand), "got: {errors:?}");
}

#[test]
fn error_unterminated_macro_is_reported() {
    let errors = collect_all_errors("      macr greet\n      prn #7\n      stop\n");
    assert!(errors.contains(&ErrorKind::Macro), "got: {errors:?}");
}

#[test]
fn label_merely_starting_with_macr_assembles_normally() {
    let (base, ok) = assemble("macr-prefix-label", "macros: .data 5, 3\n      stop\n");
    assert!(ok, "label 'macros:' must not be misdetected as a macro definition");
    let body = read_ob(&base);
    assert!(body.starts_with("  1 2\n"), "got: {body:?}");
    cleanup(&base);
}

#[test]
fn error_nested_macro_definition_is_reported() {
    let errors = collect_all_errors(
        "      macr OUTER\n      macr INNER\n      add r1, r2\n      endmacr\n      stop\n      endmacr\n      OUTER\n",
    );
    assert!(errors.contains(&ErrorKind::InvalidMacroDefinition), "got: {errors:?}");
}

#[test]
fn assembling_a_missing_file_fails_cleanly() {
    let missing = std::env::temp_dir().join("octal-assembler-it-does-not-exist.as");
    assert!(!assemble_file(&missing));
}
