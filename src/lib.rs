//! Symcheck - Go export-surface snapshot and compatibility checker.
//!
//! Symcheck detects changes that would break binary compatibility between
//! a host program and independently compiled Go plugins: extra exported
//! symbols, removed symbols, and incompatible type definitions. It takes
//! a structural snapshot of one package's exported declarations and diffs
//! two such snapshots into a deterministic list of diagnostics.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter-go front-end, package discovery and selection
//! - `symbol`: the symbol model and its JSON snapshot schema
//! - `extract`: classifies exported declarations into a symbol tree
//! - `compare`: recursive compatibility diff of two symbol trees
//! - `snapshot`: snapshot encode/decode and baseline reading
//! - `report`: terminal output
//! - `cli`: command-line surface and run driver

pub mod cli;
pub mod compare;
pub mod extract;
pub mod parser;
pub mod report;
pub mod snapshot;
pub mod symbol;

pub use compare::compare_trees;
pub use extract::{extract, ExtractError};
pub use parser::{load_package, GoParser, ParsedFile};
pub use symbol::{FuncSpec, Symbol, SymbolKind, SymbolTree};
