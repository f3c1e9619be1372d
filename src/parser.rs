//! Go front-end using tree-sitter.
//!
//! This module is the boundary to the external parser: it reads the `.go`
//! files of one directory, parses them with tree-sitter-go, groups them by
//! package clause, and selects the package to snapshot. Everything past
//! this point operates on parse trees only.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};
use walkdir::WalkDir;

/// Tree-sitter query for the package clause.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// The source is kept alongside the tree so node text can be extracted
/// without re-reading the file.
#[derive(Debug)]
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code.
    pub source: Vec<u8>,
    /// The file path (for diagnostics).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Go parser wrapping the tree-sitter grammar.
pub struct GoParser {
    language: Language,
}

impl GoParser {
    /// Create a new Go parser.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a tree-sitter parser instance.
    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse a single Go source file.
    ///
    /// Syntax errors are fatal: a snapshot taken from a half-parsed file
    /// would silently drop declarations.
    pub fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Go source: {}", path.display()))?;

        if tree.root_node().has_error() {
            anyhow::bail!("syntax errors in {}", path.display());
        }

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Extract the package name from a parsed file.
    pub fn package_name(&self, parsed: &ParsedFile) -> Option<String> {
        let query = Query::new(&self.language, PACKAGE_QUERY).ok()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(parsed.node_text(capture.node).to_string());
                }
            }
        }
        None
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and parse the `.go` files of one package in `dir`.
///
/// Files are parsed in sorted path order so the resulting symbol order is
/// stable across runs. When `package` is `None` the directory must contain
/// exactly one package; otherwise the selection is ambiguous and fatal.
pub fn load_package(dir: &Path, package: Option<&str>) -> anyhow::Result<Vec<ParsedFile>> {
    let parser = GoParser::new();

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("go")
        {
            paths.push(entry.path().to_path_buf());
        }
    }
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("no Go files found in {}", dir.display());
    }

    // Group files by package clause, keyed deterministically.
    let mut packages: BTreeMap<String, Vec<ParsedFile>> = BTreeMap::new();
    for path in &paths {
        let source = fs::read(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let parsed = parser.parse(path, &source)?;
        let pkg = parser
            .package_name(&parsed)
            .ok_or_else(|| anyhow::anyhow!("missing package clause in {}", path.display()))?;
        packages.entry(pkg).or_default().push(parsed);
    }

    match package {
        Some(name) => packages
            .remove(name)
            .ok_or_else(|| anyhow::anyhow!("package {:?} not found in {}", name, dir.display())),
        None => {
            if packages.len() == 1 {
                Ok(packages.into_values().next().unwrap())
            } else {
                anyhow::bail!(
                    "multiple packages found ({}), select one with --package",
                    packages.keys().cloned().collect::<Vec<_>>().join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse_go(source: &str) -> ParsedFile {
        GoParser::new()
            .parse(Path::new("test.go"), source.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_package_name() {
        let parser = GoParser::new();
        let parsed = parse_go("package plugin\n");
        assert_eq!(parser.package_name(&parsed), Some("plugin".to_string()));
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let parser = GoParser::new();
        let err = parser
            .parse(Path::new("bad.go"), b"package x\nfunc {")
            .unwrap_err();
        assert!(err.to_string().contains("syntax errors"));
    }

    #[test]
    fn test_load_single_package() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("a.go")).unwrap();
        writeln!(f, "package demo\n\nfunc Run() {{}}").unwrap();

        let files = load_package(dir.path(), None).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_ambiguous_package_selection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.go"), "package one\n").unwrap();
        std::fs::write(dir.path().join("b.go"), "package two\n").unwrap();

        let err = load_package(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("multiple packages"));

        let files = load_package(dir.path(), Some("two")).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_unknown_package_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.go"), "package one\n").unwrap();

        let err = load_package(dir.path(), Some("missing")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_files_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.go"), "package demo\n").unwrap();
        std::fs::write(dir.path().join("a.go"), "package demo\n").unwrap();

        let files = load_package(dir.path(), None).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].path.ends_with("a.go"));
        assert!(files[1].path.ends_with("z.go"));
    }
}
