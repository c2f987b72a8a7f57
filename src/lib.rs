//! # Two-pass 15-bit Assembler
//!
//! A complete two-pass assembler for a 15-bit-word academic machine
//! architecture.
//!
//! ## Pipeline
//!
//! Each input file is processed independently through five stages:
//!
//! 1. **Macro Table** — expands `macr`/`endmacr` blocks into an `.am`
//!    intermediate.
//! 2. **Parser** — turns the expanded source into a line-level AST,
//!    classifying operands and validating addressing modes as it goes.
//! 3. **First Pass** — lays out the memory image, builds the symbol
//!    table, and records fixups for unresolved labels.
//! 4. **Second Pass** — resolves fixups and records external usage
//!    sites.
//! 5. **Output Writer** — emits `.ob`/`.ent`/`.ext`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use octal_assembler::driver::assemble_file;
//! use std::path::Path;
//!
//! let ok = assemble_file(Path::new("program.as"));
//! if ok {
//!     println!("assembled cleanly");
//! }
//! ```

pub mod driver;
pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod macros;
pub mod operand;
pub mod parser;
pub mod second_pass;
pub mod symbol_table;
pub mod validator;
pub mod writer;
