//! Symbol extractor: turn parsed declarations into a symbol tree.
//!
//! Walks the top-level declarations of each parsed file, keeps the
//! exported ones, and classifies each into a [`Symbol`]. Classification
//! over type expressions is total: every node either maps onto one of the
//! closed [`TypeShape`] variants or fails with
//! [`ExtractError::UnsupportedTypeShape`], which aborts the whole run —
//! a partial snapshot would make later comparisons lie.

use thiserror::Error;
use tree_sitter::Node;

use crate::parser::ParsedFile;
use crate::symbol::{FuncSpec, Symbol, SymbolKind, SymbolTree};

/// Errors produced during extraction. The caller decides the policy;
/// the current driver aborts the run without a partial tree.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A declared type's shape matches no classification rule.
    #[error("unsupported type shape ({type_kind}) at {file}:offset {offset}")]
    UnsupportedTypeShape {
        type_kind: String,
        file: String,
        offset: usize,
    },
}

impl ExtractError {
    fn unsupported(parsed: &ParsedFile, node: Node) -> Self {
        ExtractError::UnsupportedTypeShape {
            type_kind: node.kind().to_string(),
            file: parsed.path.clone(),
            offset: node.start_byte(),
        }
    }
}

/// Classification of a declared type expression.
///
/// Pointer, map, channel, function and qualified types have no variant
/// here: they fail classification instead.
enum TypeShape<'t> {
    /// A plain named type (`type Foo int`, or `int` as a parameter).
    Identifier(String),
    /// A struct body with named fields and/or embedded types.
    Record(Node<'t>),
    /// An interface body with method signatures and/or embedded names.
    Interface(Node<'t>),
    /// A slice or array; the string is `"[]"` plus the element's text.
    Array(String),
}

/// Classify a type expression node. Total over the closed shape set.
fn classify_type<'t>(parsed: &ParsedFile, node: Node<'t>) -> Result<TypeShape<'t>, ExtractError> {
    match node.kind() {
        "struct_type" => Ok(TypeShape::Record(node)),
        "interface_type" => Ok(TypeShape::Interface(node)),
        "type_identifier" => Ok(TypeShape::Identifier(parsed.node_text(node).to_string())),
        "slice_type" | "array_type" => match node.child_by_field_name("element") {
            Some(elem) => Ok(TypeShape::Array(format!("[]{}", parsed.node_text(elem)))),
            None => Err(ExtractError::unsupported(parsed, node)),
        },
        _ => Err(ExtractError::unsupported(parsed, node)),
    }
}

/// Build a symbol for a declared or anonymous type.
///
/// `pos` is set for top-level type declarations only; parameters and
/// returns pass `None` so nested symbols stay position-free. Array
/// symbols encode the element shape in the label, replacing the declared
/// name, which matches the snapshot format of earlier tool versions.
fn type_symbol(
    parsed: &ParsedFile,
    label: &str,
    type_node: Node,
    pos: Option<usize>,
) -> Result<Symbol, ExtractError> {
    let mut sym = match classify_type(parsed, type_node)? {
        TypeShape::Identifier(name) => {
            let mut s = Symbol::new(SymbolKind::Type);
            s.label = label.to_string();
            s.underlying_type = name;
            s
        }
        TypeShape::Record(body) => {
            let mut s = Symbol::new(SymbolKind::Struct);
            s.label = label.to_string();
            s.members = struct_members(parsed, body)?;
            s
        }
        TypeShape::Interface(body) => {
            let mut s = Symbol::new(SymbolKind::Interface);
            s.label = label.to_string();
            s.members = interface_members(parsed, body)?;
            s
        }
        TypeShape::Array(elem_label) => {
            let mut s = Symbol::new(SymbolKind::Array);
            s.label = elem_label;
            s
        }
    };
    if let Some(p) = pos {
        sym.pos = p;
    }
    Ok(sym)
}

/// Extract struct members: one symbol per field group (first name only),
/// one `embed` symbol per embedded type. Field types are not recursed
/// into; the member's identity is its name.
fn struct_members(parsed: &ParsedFile, struct_node: Node) -> Result<Vec<Symbol>, ExtractError> {
    let mut members = Vec::new();

    let body = struct_node
        .named_children(&mut struct_node.walk())
        .find(|n| n.kind() == "field_declaration_list");
    let body = match body {
        Some(b) => b,
        None => return Ok(members),
    };

    for field in body.named_children(&mut body.walk()) {
        if field.kind() != "field_declaration" {
            continue;
        }
        let first_name = field.children_by_field_name("name", &mut field.walk()).next();
        match first_name {
            Some(name) => {
                let mut s = Symbol::new(SymbolKind::Member);
                s.label = parsed.node_text(name).to_string();
                members.push(s);
            }
            None => {
                // Embedded field: the type node carries the name.
                let typ = field
                    .child_by_field_name("type")
                    .ok_or_else(|| ExtractError::unsupported(parsed, field))?;
                if typ.kind() != "type_identifier" {
                    return Err(ExtractError::unsupported(parsed, typ));
                }
                let mut s = Symbol::new(SymbolKind::Embed);
                s.label = parsed.node_text(typ).to_string();
                members.push(s);
            }
        }
    }

    Ok(members)
}

/// Extract interface members: `method` symbols with their own func specs,
/// `embed` symbols for embedded interface names.
fn interface_members(parsed: &ParsedFile, iface_node: Node) -> Result<Vec<Symbol>, ExtractError> {
    let mut members = Vec::new();

    for elem in iface_node.named_children(&mut iface_node.walk()) {
        match elem.kind() {
            "method_elem" | "method_spec" => {
                let name = elem
                    .child_by_field_name("name")
                    .ok_or_else(|| ExtractError::unsupported(parsed, elem))?;
                let mut s = Symbol::new(SymbolKind::Method);
                s.label = parsed.node_text(name).to_string();
                s.func_spec = Some(func_spec(
                    parsed,
                    elem.child_by_field_name("parameters"),
                    elem.child_by_field_name("result"),
                )?);
                members.push(s);
            }
            "type_identifier" | "interface_type_name" => {
                let mut s = Symbol::new(SymbolKind::Embed);
                s.label = parsed.node_text(elem).to_string();
                members.push(s);
            }
            // Embedded name wrapped in a constraint element; anything but a
            // single plain identifier is outside the shape set.
            "type_elem" | "constraint_elem" => {
                let inner = elem.named_child(0);
                match inner {
                    Some(n) if elem.named_child_count() == 1 && n.kind() == "type_identifier" => {
                        let mut s = Symbol::new(SymbolKind::Embed);
                        s.label = parsed.node_text(n).to_string();
                        members.push(s);
                    }
                    _ => return Err(ExtractError::unsupported(parsed, elem)),
                }
            }
            "comment" => {}
            _ => return Err(ExtractError::unsupported(parsed, elem)),
        }
    }

    Ok(members)
}

/// Build a func spec from parameter and result nodes.
///
/// Each entry is classified as an anonymous type through the same shape
/// dispatch as declarations: no label, no position. One entry per source
/// group (`a, b int` is a single entry), mirroring Go's grouping.
fn func_spec(
    parsed: &ParsedFile,
    params: Option<Node>,
    result: Option<Node>,
) -> Result<FuncSpec, ExtractError> {
    let mut spec = FuncSpec::default();

    if let Some(list) = params {
        spec.params = parameter_symbols(parsed, list)?;
    }
    if let Some(res) = result {
        if res.kind() == "parameter_list" {
            spec.returns = parameter_symbols(parsed, res)?;
        } else {
            // Single bare return type, e.g. `func F() error`.
            spec.returns.push(type_symbol(parsed, "", res, None)?);
        }
    }

    Ok(spec)
}

/// Classify every entry of a parameter list.
fn parameter_symbols(parsed: &ParsedFile, list: Node) -> Result<Vec<Symbol>, ExtractError> {
    let mut out = Vec::new();
    for param in list.named_children(&mut list.walk()) {
        match param.kind() {
            "parameter_declaration" => {
                let typ = param
                    .child_by_field_name("type")
                    .ok_or_else(|| ExtractError::unsupported(parsed, param))?;
                out.push(type_symbol(parsed, "", typ, None)?);
            }
            "comment" => {}
            // Variadic parameters and anything else are outside the shape set.
            _ => return Err(ExtractError::unsupported(parsed, param)),
        }
    }
    Ok(out)
}

/// Resolve a method's receiver type name.
///
/// Only a plain named receiver resolves; pointer and generic receivers
/// fall back to the `"unknown"` sentinel.
fn receiver_type(parsed: &ParsedFile, decl: Node) -> String {
    if let Some(recv) = decl.child_by_field_name("receiver") {
        for param in recv.named_children(&mut recv.walk()) {
            if param.kind() != "parameter_declaration" {
                continue;
            }
            if let Some(typ) = param.child_by_field_name("type") {
                if typ.kind() == "type_identifier" {
                    return parsed.node_text(typ).to_string();
                }
            }
        }
    }
    "unknown".to_string()
}

/// A name is part of the exported surface when its first character is
/// uppercase (Go's visibility convention).
fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Extract the exported surface of a package from its parsed files.
///
/// Files are processed in the order given (the front-end sorts them), and
/// declarations in source order within each file, so the resulting tree is
/// deterministic. Unexported declarations are silently skipped.
pub fn extract(files: &[ParsedFile]) -> Result<SymbolTree, ExtractError> {
    let mut exports = Vec::new();

    for parsed in files {
        let root = parsed.tree.root_node();
        for decl in root.named_children(&mut root.walk()) {
            match decl.kind() {
                "function_declaration" => {
                    let name = match decl.child_by_field_name("name") {
                        Some(n) => parsed.node_text(n).to_string(),
                        None => continue,
                    };
                    if !is_exported(&name) {
                        continue;
                    }
                    let mut sym = Symbol::new(SymbolKind::Func);
                    sym.label = name;
                    sym.file_name = parsed.path.clone();
                    sym.pos = decl.start_byte();
                    sym.func_spec = Some(func_spec(
                        parsed,
                        decl.child_by_field_name("parameters"),
                        decl.child_by_field_name("result"),
                    )?);
                    exports.push(sym);
                }
                "method_declaration" => {
                    let name = match decl.child_by_field_name("name") {
                        Some(n) => parsed.node_text(n).to_string(),
                        None => continue,
                    };
                    if !is_exported(&name) {
                        continue;
                    }
                    let mut sym = Symbol::new(SymbolKind::Method);
                    sym.label = name;
                    sym.receiver_type = receiver_type(parsed, decl);
                    sym.file_name = parsed.path.clone();
                    sym.pos = decl.start_byte();
                    sym.func_spec = Some(func_spec(
                        parsed,
                        decl.child_by_field_name("parameters"),
                        decl.child_by_field_name("result"),
                    )?);
                    exports.push(sym);
                }
                "type_declaration" => {
                    for spec in decl.named_children(&mut decl.walk()) {
                        if !matches!(spec.kind(), "type_spec" | "type_alias") {
                            continue;
                        }
                        let name = match spec.child_by_field_name("name") {
                            Some(n) => parsed.node_text(n).to_string(),
                            None => continue,
                        };
                        if !is_exported(&name) {
                            continue;
                        }
                        let typ = spec
                            .child_by_field_name("type")
                            .ok_or_else(|| ExtractError::unsupported(parsed, spec))?;
                        let mut sym =
                            type_symbol(parsed, &name, typ, Some(spec.start_byte()))?;
                        sym.file_name = parsed.path.clone();
                        exports.push(sym);
                    }
                }
                "var_declaration" | "const_declaration" => {
                    for spec in decl.named_children(&mut decl.walk()) {
                        collect_value_spec(parsed, spec, &mut exports);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(exports)
}

/// Record a var/const spec as a `var` symbol.
///
/// Only the first declared name of a multi-name spec is recorded: one
/// symbol per declaration group, not per name.
fn collect_value_spec(parsed: &ParsedFile, spec: Node, exports: &mut Vec<Symbol>) {
    match spec.kind() {
        "var_spec" | "const_spec" => {
            let name = match spec.children_by_field_name("name", &mut spec.walk()).next() {
                Some(n) => parsed.node_text(n).to_string(),
                None => return,
            };
            if !is_exported(&name) {
                return;
            }
            let mut sym = Symbol::new(SymbolKind::Var);
            sym.label = name;
            sym.file_name = parsed.path.clone();
            sym.pos = spec.start_byte();
            exports.push(sym);
        }
        // Some grammar versions wrap grouped specs in a list node.
        "var_spec_list" | "const_spec_list" => {
            for inner in spec.named_children(&mut spec.walk()) {
                collect_value_spec(parsed, inner, exports);
            }
        }
        _ => {}
    }
}
