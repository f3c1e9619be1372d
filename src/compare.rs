//! Compatibility comparator: diff two symbol trees.
//!
//! Comparison is exhaustive, never fail-fast: every structural difference
//! in every matched pair and sub-structure is collected before returning.
//! An empty result means the trees are compatible.
//!
//! Diagnostic order is deterministic: matched and extra symbols follow the
//! target tree's declaration order, unmatched source symbols are appended
//! in the source tree's declaration order.

use std::collections::{HashMap, VecDeque};

use crate::symbol::{FuncSpec, Symbol, SymbolKind};

/// Compare two symbol trees and collect every incompatibility.
///
/// `compare_labels` controls whether name differences count: top-level and
/// member comparisons pass `true`, func-spec comparisons pass `false`
/// (parameters and returns are positional and unnamed).
///
/// Symbols are matched by ident. Top-level idents are unique within a
/// tree, but anonymous func-spec entries all share the ident `"."`, so
/// entries with equal idents are paired first-to-first: that makes
/// parameter and return matching positional.
pub fn compare_trees(source: &[Symbol], target: &[Symbol], compare_labels: bool) -> Vec<String> {
    let mut diffs = Vec::new();

    let mut lookup: HashMap<String, VecDeque<&Symbol>> = HashMap::new();
    for sym in source {
        lookup.entry(sym.ident()).or_default().push_back(sym);
    }

    for sym in target {
        match lookup.get_mut(&sym.ident()).and_then(|q| q.pop_front()) {
            Some(orig) => diffs.extend(compare_symbol(orig, sym, compare_labels)),
            None => diffs.push(format!("extra symbol found: {}", sym)),
        }
    }

    // Anything left in the lookup was never matched; report in source
    // declaration order, not map order.
    for sym in source {
        if lookup
            .get_mut(&sym.ident())
            .and_then(|q| q.pop_front())
            .is_some()
        {
            diffs.push(format!("missing symbol: {}", sym));
        }
    }

    diffs
}

/// Compare one matched pair of symbols.
fn compare_symbol(a: &Symbol, b: &Symbol, compare_labels: bool) -> Vec<String> {
    let mut diffs = Vec::new();

    if a.kind != b.kind {
        diffs.push(format!(
            "{} and {} have different symbol types: {} and {}",
            a, b, a.kind, b.kind
        ));
    }
    if compare_labels && a.label != b.label {
        diffs.push(format!(
            "{} and {} have different labels: {} and {}",
            a, b, a.label, b.label
        ));
    }
    if a.kind == SymbolKind::Type && a.underlying_type != b.underlying_type {
        diffs.push(format!(
            "type alias {} and {} have different underlying types: {} and {}",
            a, b, a.underlying_type, b.underlying_type
        ));
    }
    if a.kind == SymbolKind::Method && a.receiver_type != b.receiver_type {
        diffs.push(format!(
            "method {} and {} have different receiver types: {} and {}",
            a, b, a.receiver_type, b.receiver_type
        ));
    }

    // Struct fields and interface methods are always matched by name.
    diffs.extend(compare_trees(&a.members, &b.members, true));

    if a.kind.is_callable() {
        diffs.extend(compare_func_spec(
            a.func_spec.as_ref(),
            b.func_spec.as_ref(),
        ));
    }

    diffs
}

/// Compare parameter and return lists positionally, prefixing each
/// resulting diagnostic with where in the signature it was found.
fn compare_func_spec(a: Option<&FuncSpec>, b: Option<&FuncSpec>) -> Vec<String> {
    let empty = FuncSpec::default();
    let a = a.unwrap_or(&empty);
    let b = b.unwrap_or(&empty);

    let mut diffs = Vec::new();
    for diff in compare_trees(&a.params, &b.params, false) {
        diffs.push(format!("func param mismatch: {}", diff));
    }
    for diff in compare_trees(&a.returns, &b.returns, false) {
        diffs.push(format!("func result mismatch: {}", diff));
    }
    diffs
}
