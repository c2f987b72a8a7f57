//! # Macro Table
//!
//! A one-shot textual pre-pass: collects `macr NAME` / `endmacr` blocks
//! and substitutes each call site with the stored body, in a single
//! forward scan of the source. Expanded bodies are never rescanned for
//! further macro calls (spec.md §4.3), and a macro must be defined
//! before any line that calls it, matching `original_source/macros.c`'s
//! single streaming pass over the input file.

use crate::error::{AsmError, ErrorJournal, ErrorKind};
use crate::validator::is_reserved_word;

#[derive(Debug, Default)]
pub struct MacroTable {
    macros: Vec<(String, Vec<String>)>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, name: &str) -> Option<&[String]> {
        self.macros.iter().find(|(n, _)| n == name).map(|(_, body)| body.as_slice())
    }

    fn is_defined(&self, name: &str) -> bool {
        self.macros.iter().any(|(n, _)| n == name)
    }
}

/// Expand every `macr`/`endmacr` block in `source`, returning the
/// expanded text (the `.am` contents). Diagnostics are recorded in
/// `errors` but never stop expansion outright: a malformed macro
/// definition is dropped and scanning resumes at the next line, so one
/// bad macro doesn't hide errors later in the file.
pub fn expand(source: &str, file: &str, errors: &mut ErrorJournal) -> String {
    let mut table = MacroTable::new();
    let mut output = String::new();
    let mut lines = source.lines().enumerate().peekable();

    while let Some((line_no, raw_line)) = lines.next() {
        let line = raw_line.trim();
        let lineno = line_no + 1;
        let mut tokens = line.split_whitespace();
        let first_token = tokens.next().unwrap_or("");

        if first_token == "macr" {
            let rest: Vec<&str> = tokens.collect();
            if rest.len() != 1 {
                errors.record(AsmError::new(
                    ErrorKind::InvalidMacroDefinition,
                    file,
                    lineno,
                    "macro definition must be 'macr NAME' with exactly one name",
                ));
                skip_until_endmacr(&mut lines);
                continue;
            }
            let name = rest[0];
            if is_reserved_word(name) || table.is_defined(name) {
                errors.record(AsmError::new(
                    ErrorKind::InvalidMacroDefinition,
                    file,
                    lineno,
                    format!("'{name}' is not a valid macro name"),
                ));
                skip_until_endmacr(&mut lines);
                continue;
            }

            let mut body = Vec::new();
            let mut closed = false;
            let mut nested_depth = 0u32;
            for (body_line_no, body_line) in lines.by_ref() {
                let body_trimmed = body_line.trim();
                let body_first_token = body_trimmed.split_whitespace().next().unwrap_or("");

                if body_first_token == "macr" {
                    errors.record(AsmError::new(
                        ErrorKind::InvalidMacroDefinition,
                        file,
                        body_line_no + 1,
                        format!("macro '{name}' contains a nested macro definition, which is not allowed"),
                    ));
                    nested_depth += 1;
                    continue;
                }

                if body_trimmed == "endmacr" {
                    if nested_depth == 0 {
                        closed = true;
                        break;
                    }
                    nested_depth -= 1;
                    continue;
                }

                body.push(body_line.to_string());
            }
            if !closed {
                errors.record(AsmError::new(
                    ErrorKind::Macro,
                    file,
                    lineno,
                    format!("macro '{name}' is missing its 'endmacr'"),
                ));
            }
            table.macros.push((name.to_string(), body));
            continue;
        }

        if line == "endmacr" {
            errors.record(AsmError::new(
                ErrorKind::Macro,
                file,
                lineno,
                "'endmacr' with no matching 'macr'",
            ));
            continue;
        }

        if let Some(body) = table.lookup(line) {
            for body_line in body {
                output.push_str(body_line);
                output.push('\n');
            }
            continue;
        }

        output.push_str(raw_line);
        output.push('\n');
    }

    output
}

fn skip_until_endmacr<'a>(lines: &mut std::iter::Peekable<impl Iterator<Item = (usize, &'a str)>>) {
    for (_, line) in lines.by_ref() {
        if line.trim() == "endmacr" {
            break;
        }
    }
}
