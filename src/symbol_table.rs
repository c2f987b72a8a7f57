//! # Symbol Table
//!
//! Insertion-ordered table mapping labels to addresses and kinds, built
//! during the first pass and consulted (read-only) during the second.
//! Kept as a single `Vec` rather than a `HashMap`, matching the teacher's
//! own `first_pass/symbol_table.rs`: an academic-scale source file has at
//! most a few dozen labels, so a linear scan is both simpler and fast
//! enough, and it preserves definition order for `debug_dump`.

/// What a symbol was defined as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Defined by a label on an instruction line.
    Code,
    /// Defined by a label on a `.data`/`.string` line.
    Data,
    /// Declared via `.extern`; its address is not known in this file.
    External,
}

#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: String,
    pub address: u16,
    pub kind: SymbolKind,
    pub is_entry: bool,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new symbol. Returns `false` without modifying the table if
    /// `name` is already defined with different attributes — callers turn
    /// that into a `DuplicateLabel`/`SymbolConflict` diagnostic. A repeat
    /// definition with identical `address`/`kind` is a silent no-op
    /// (spec.md §4.2: repeat `.extern` of the same name is permitted).
    pub fn define(&mut self, name: &str, address: u16, kind: SymbolKind) -> bool {
        if let Some(existing) = self.lookup(name) {
            return existing.address == address && existing.kind == kind;
        }
        self.entries.push(SymbolEntry { name: name.to_string(), address, kind, is_entry: false });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Mark an already-defined symbol as exported via `.entry`. Returns
    /// `false` if no such symbol has been defined yet — the caller
    /// defers resolution until the whole file has been scanned, since
    /// `.entry NAME` may appear before `NAME`'s own definition.
    pub fn mark_entry(&mut self, name: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.is_entry = true;
                true
            }
            None => false,
        }
    }

    pub fn is_external(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some(e) if e.kind == SymbolKind::External)
    }

    /// Add `final_ic` to every Data-kind symbol's address. Data symbols
    /// are recorded during the first pass as `100 + DC_at_definition`
    /// (provisional, since DC restarts at 0 while IC starts at 100);
    /// once the final instruction count is known this shifts every data
    /// label past the end of the code segment, matching the memory
    /// image layout in spec.md §3.
    pub fn relocate_data_symbols(&mut self, final_ic: u16) {
        for entry in &mut self.entries {
            if entry.kind == SymbolKind::Data {
                entry.address += final_ic;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn entry_symbols(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter().filter(|e| e.is_entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Debug dump to stdout, kept for library consumers/tests; the CLI
    /// itself never calls this (see SPEC_FULL.md §10).
    pub fn debug_dump(&self) {
        println!("//\tSymbol Name\tAddress\tKind\tEntry");
        println!("//\t-----------\t-------\t----\t-----");
        for entry in &self.entries {
            println!(
                "//\t{}\t\t{}\t{:?}\t{}",
                entry.name, entry.address, entry.kind, entry.is_entry
            );
        }
    }
}
