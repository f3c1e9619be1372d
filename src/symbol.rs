//! Symbol model for one Go package's exported surface.
//!
//! A [`Symbol`] describes a single exported declaration (or a nested
//! sub-declaration such as a struct field or an interface method). The
//! serde attributes on these types are part of the snapshot compatibility
//! contract: field names and omit-when-empty behavior must match the JSON
//! emitted by earlier releases, so snapshots stay comparable across
//! versions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of symbol. This is a closed set: no other shapes are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Func,
    Method,
    Type,
    Struct,
    Interface,
    Embed,
    Member,
    Var,
    Array,
}

impl SymbolKind {
    /// Convert to the string used in snapshots and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Func => "func",
            SymbolKind::Method => "method",
            SymbolKind::Type => "type",
            SymbolKind::Struct => "struct",
            SymbolKind::Interface => "interface",
            SymbolKind::Embed => "embed",
            SymbolKind::Member => "member",
            SymbolKind::Var => "var",
            SymbolKind::Array => "array",
        }
    }

    /// Check if this kind carries a [`FuncSpec`].
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Func | SymbolKind::Method)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One declaration in the exported surface.
///
/// `file_name` and `pos` are diagnostic-only; they never participate in
/// comparison. Nested symbols (members, parameters, returns) carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Symbol name. Empty for anonymous entries (parameters, returns).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// The symbol kind, serialized under the `type` key.
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// For `type` symbols: name of the aliased type.
    #[serde(
        rename = "underlyingType",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub underlying_type: String,
    /// For `method` symbols: name of the receiver type, or `"unknown"`
    /// when the receiver's type expression is not a plain identifier.
    #[serde(
        rename = "receiverType",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub receiver_type: String,
    /// Source file the symbol was extracted from (top-level symbols only).
    #[serde(rename = "fileName", default, skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    /// Byte offset within the source file (top-level symbols only).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pos: usize,
    /// Nested symbols: struct fields or interface methods/embeds, in
    /// declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Symbol>,
    /// Parameter and return shapes, present for `func` and `method` only.
    #[serde(rename = "funcSpec", default, skip_serializing_if = "Option::is_none")]
    pub func_spec: Option<FuncSpec>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Symbol {
    /// Create a symbol of the given kind with everything else empty.
    pub fn new(kind: SymbolKind) -> Self {
        Self {
            label: String::new(),
            kind,
            underlying_type: String::new(),
            receiver_type: String::new(),
            file_name: String::new(),
            pos: 0,
            members: Vec::new(),
            func_spec: None,
        }
    }

    /// Composite key used to match symbols between two snapshots.
    ///
    /// Methods are disambiguated from free functions by a non-empty
    /// receiver type, so `Config.Validate` and `.Validate` never collide.
    pub fn ident(&self) -> String {
        format!("{}.{}", self.receiver_type, self.label)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident())?;
        if !self.file_name.is_empty() && self.pos != 0 {
            write!(f, " ({}:offset {})", self.file_name, self.pos)?;
        }
        Ok(())
    }
}

/// Parameter and return shapes of a function or method.
///
/// Entries are anonymous and positional; their labels are never compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Symbol>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<Symbol>,
}

/// Ordered sequence of top-level symbols for one package's exported
/// surface. Built once by the extractor, then read-only.
pub type SymbolTree = Vec<Symbol>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_free_function() {
        let mut sym = Symbol::new(SymbolKind::Func);
        sym.label = "Run".to_string();
        assert_eq!(sym.ident(), ".Run");
    }

    #[test]
    fn test_ident_method() {
        let mut sym = Symbol::new(SymbolKind::Method);
        sym.label = "Validate".to_string();
        sym.receiver_type = "Config".to_string();
        assert_eq!(sym.ident(), "Config.Validate");
    }

    #[test]
    fn test_display_with_location() {
        let mut sym = Symbol::new(SymbolKind::Struct);
        sym.label = "Config".to_string();
        sym.file_name = "config.go".to_string();
        sym.pos = 42;
        assert_eq!(sym.to_string(), ".Config (config.go:offset 42)");
    }

    #[test]
    fn test_display_without_location() {
        let mut sym = Symbol::new(SymbolKind::Var);
        sym.label = "Version".to_string();
        assert_eq!(sym.to_string(), ".Version");
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let mut sym = Symbol::new(SymbolKind::Var);
        sym.label = "Version".to_string();
        let json = serde_json::to_string(&sym).unwrap();
        assert_eq!(json, r#"{"label":"Version","type":"var"}"#);
    }

    #[test]
    fn test_serialize_anonymous_param() {
        let mut sym = Symbol::new(SymbolKind::Type);
        sym.underlying_type = "string".to_string();
        let json = serde_json::to_string(&sym).unwrap();
        assert_eq!(json, r#"{"type":"type","underlyingType":"string"}"#);
    }

    #[test]
    fn test_deserialize_missing_fields_default() {
        let sym: Symbol = serde_json::from_str(r#"{"type":"embed","label":"Closer"}"#).unwrap();
        assert_eq!(sym.kind, SymbolKind::Embed);
        assert_eq!(sym.label, "Closer");
        assert!(sym.underlying_type.is_empty());
        assert!(sym.receiver_type.is_empty());
        assert_eq!(sym.pos, 0);
        assert!(sym.members.is_empty());
        assert!(sym.func_spec.is_none());
    }

    #[test]
    fn test_roundtrip_nested_symbol() {
        let mut param = Symbol::new(SymbolKind::Type);
        param.underlying_type = "int".to_string();

        let mut method = Symbol::new(SymbolKind::Method);
        method.label = "SetPort".to_string();
        method.func_spec = Some(FuncSpec {
            params: vec![param],
            returns: Vec::new(),
        });

        let mut iface = Symbol::new(SymbolKind::Interface);
        iface.label = "Plugin".to_string();
        iface.file_name = "plugin.go".to_string();
        iface.pos = 120;
        iface.members = vec![method];

        let json = serde_json::to_string(&iface).unwrap();
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iface);
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(SymbolKind::Func.as_str(), "func");
        assert_eq!(SymbolKind::Interface.as_str(), "interface");
        assert!(SymbolKind::Method.is_callable());
        assert!(!SymbolKind::Struct.is_callable());
    }
}
