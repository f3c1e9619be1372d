//! Snapshot codec: persist a symbol tree as JSON and read one back.
//!
//! A snapshot is a JSON array of top-level symbols. Empty fields are
//! omitted rather than written as null, so the on-disk format matches
//! snapshots produced by earlier tool versions byte-for-byte in spirit
//! (key names and optionality, not whitespace).

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::symbol::SymbolTree;

/// Encode a symbol tree as a compact JSON snapshot.
pub fn encode(tree: &SymbolTree) -> anyhow::Result<String> {
    serde_json::to_string(tree).context("failed to encode snapshot")
}

/// Decode a JSON snapshot back into a symbol tree.
pub fn decode(data: &str) -> anyhow::Result<SymbolTree> {
    serde_json::from_str(data).context("malformed snapshot")
}

/// Write a snapshot to the given writer, newline-terminated.
pub fn write<W: Write>(tree: &SymbolTree, mut out: W) -> anyhow::Result<()> {
    let json = encode(tree)?;
    writeln!(out, "{}", json).context("failed to write snapshot")?;
    Ok(())
}

/// Read a baseline snapshot file. Unreadable or malformed baselines are
/// fatal setup errors.
pub fn read_baseline(path: &Path) -> anyhow::Result<SymbolTree> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read baseline snapshot {}", path.display()))?;
    decode(&data).with_context(|| format!("invalid baseline snapshot {}", path.display()))
}
