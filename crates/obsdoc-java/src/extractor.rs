//! Source unit extraction for Java source code

use obsdoc_parser_api::{ParserConfig, ParserError, SourceUnit};
use std::path::Path;
use tree_sitter::{Node, Parser};
use tracing::debug;

use crate::visitor::JavaVisitor;

/// Reduce Java source code to a [`SourceUnit`]
pub fn extract(
    source: &str,
    file_path: &Path,
    config: &ParserConfig,
) -> Result<SourceUnit, ParserError> {
    let mut parser = Parser::new();
    let language = tree_sitter_java::language();
    parser
        .set_language(&language)
        .map_err(|e| ParserError::ParseError(file_path.to_path_buf(), e.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| {
        ParserError::ParseError(file_path.to_path_buf(), "Failed to parse".to_string())
    })?;

    let root_node = tree.root_node();

    if root_node.has_error() {
        let (line, column) = first_error(root_node)
            .map(|n| (n.start_position().row + 1, n.start_position().column + 1))
            .unwrap_or((0, 0));
        if config.strict {
            return Err(ParserError::SyntaxError(
                file_path.to_path_buf(),
                line,
                column,
                "Syntax error".to_string(),
            ));
        }
        debug!(
            file = %file_path.display(),
            line,
            column,
            "Syntax error, keeping recoverable declarations"
        );
    }

    let mut visitor = JavaVisitor::new(source.as_bytes(), config.clone());
    visitor.visit_node(root_node);

    if visitor.types.is_empty() {
        return Err(ParserError::NoTypeDeclaration(file_path.to_path_buf()));
    }

    let mut unit = SourceUnit::new(file_path);
    unit.package = visitor.package;
    unit.imports = visitor.imports;
    unit.types = visitor.types;

    Ok(unit)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}
