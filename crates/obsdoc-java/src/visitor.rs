//! AST visitor for reducing Java syntax trees to source units

use obsdoc_parser_api::{
    EnumConstant, Expr, ImportDecl, MethodBody, MethodDecl, ParserConfig, TypeDecl, TypeKind,
};
use tree_sitter::Node;

pub struct JavaVisitor<'a> {
    pub source: &'a [u8],
    pub config: ParserConfig,
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
}

impl<'a> JavaVisitor<'a> {
    pub fn new(source: &'a [u8], config: ParserConfig) -> Self {
        Self {
            source,
            config,
            package: None,
            imports: Vec::new(),
            types: Vec::new(),
        }
    }

    fn node_text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    /// Visit the compilation unit. Only top-level declarations are of interest;
    /// nested types are reached through their enclosing body.
    pub fn visit_node(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => self.visit_package(child),
                "import_declaration" => self.visit_import(child),
                kind if type_kind(kind).is_some() => {
                    if let Some(decl) = self.visit_type(child, None) {
                        self.types.push(decl);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_package(&mut self, node: Node) {
        // package com.example.app;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "scoped_identifier" || child.kind() == "identifier" {
                self.package = Some(self.node_text(child));
                break;
            }
        }
    }

    fn visit_import(&mut self, node: Node) {
        // import java.util.List;
        // import java.util.*;
        // import static io.micrometer.Tags.KEY;
        let mut cursor = node.walk();
        let mut imported = String::new();
        let mut is_wildcard = false;
        let mut is_static = false;

        for child in node.children(&mut cursor) {
            match child.kind() {
                "scoped_identifier" | "identifier" => {
                    imported = self.node_text(child);
                }
                "asterisk" => {
                    is_wildcard = true;
                }
                "static" => {
                    is_static = true;
                }
                _ => {}
            }
        }

        if !imported.is_empty() {
            self.imports.push(ImportDecl {
                name: imported,
                is_static,
                is_wildcard,
            });
        }
    }

    fn visit_type(&self, node: Node, parent: Option<&TypeDecl>) -> Option<TypeDecl> {
        let kind = type_kind(node.kind())?;
        let name = node.child_by_field_name("name").map(|n| self.node_text(n))?;

        let mut decl = match parent {
            Some(parent) => parent.nested_type(kind, name),
            None => TypeDecl::new(kind, self.package.as_deref(), name),
        };
        decl.line_start = node.start_position().row + 1;
        decl.line_end = node.end_position().row + 1;
        decl.doc_comment = self.extract_doc_comment(node);

        if let Some(superclass) = node.child_by_field_name("superclass") {
            decl.superclass = self.first_type_text(superclass);
        }

        // implements (classes, enums, records) / extends (interfaces)
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "super_interfaces" || child.kind() == "extends_interfaces" {
                self.extract_type_list(child, &mut decl.interfaces);
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.visit_body(body, &mut decl);
        }

        Some(decl)
    }

    fn visit_body(&self, body: Node, decl: &mut TypeDecl) {
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "method_declaration" => decl.methods.push(self.visit_method(child)),
                "enum_constant" => {
                    if let Some(constant) = self.visit_enum_constant(child) {
                        decl.constants.push(constant);
                    }
                }
                // `;` followed by the enum's own fields, constructors and methods
                "enum_body_declarations" => self.visit_body(child, decl),
                kind if type_kind(kind).is_some() => {
                    if let Some(nested) = self.visit_type(child, Some(&*decl)) {
                        decl.nested.push(nested);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_enum_constant(&self, node: Node) -> Option<EnumConstant> {
        let name = node.child_by_field_name("name").map(|n| self.node_text(n))?;
        let mut constant = EnumConstant::new(name);
        constant.line = node.start_position().row + 1;
        constant.doc_comment = self.extract_doc_comment(node);

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.children(&mut cursor) {
                if child.kind() == "method_declaration" {
                    constant.methods.push(self.visit_method(child));
                }
            }
        }

        Some(constant)
    }

    fn visit_method(&self, node: Node) -> MethodDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_else(|| "method".to_string());

        let body = match node.child_by_field_name("body") {
            Some(block) => self.classify_body(block),
            None => MethodBody::Abstract,
        };

        let mut method = MethodDecl::new(name, body)
            .with_parameters(self.count_parameters(node))
            .at_line(node.start_position().row + 1);
        method.doc_comment = self.extract_doc_comment(node);
        method
    }

    fn count_parameters(&self, node: Node) -> usize {
        let Some(params) = node.child_by_field_name("parameters") else {
            return 0;
        };
        let mut cursor = params.walk();
        let count = params
            .children(&mut cursor)
            .filter(|c| c.kind() == "formal_parameter" || c.kind() == "spread_parameter")
            .count();
        count
    }

    /// A body is usable only when it is a single `return <expr>;`.
    fn classify_body(&self, block: Node) -> MethodBody {
        let mut cursor = block.walk();
        let statements: Vec<Node> = block
            .named_children(&mut cursor)
            .filter(|c| !is_comment(c.kind()))
            .collect();

        if let [statement] = statements.as_slice() {
            if statement.kind() == "return_statement" {
                if let Some(expr) = statement
                    .named_child(0)
                    .and_then(|value| self.classify_expr(value))
                {
                    return MethodBody::Return(expr);
                }
            }
        }

        MethodBody::Unsupported(self.node_text(block))
    }

    pub(crate) fn classify_expr(&self, node: Node) -> Option<Expr> {
        match node.kind() {
            "string_literal" => Some(Expr::StringLiteral(string_value(&self.node_text(node)))),
            "true" => Some(Expr::Boolean(true)),
            "false" => Some(Expr::Boolean(false)),
            "null_literal" => Some(Expr::Null),
            "class_literal" => node
                .named_child(0)
                .map(|ty| Expr::TypeReference(squash(&self.node_text(ty)))),
            "field_access" | "identifier" | "scoped_identifier" => {
                Some(Expr::QualifiedName(squash(&self.node_text(node))))
            }
            "parenthesized_expression" => node
                .named_child(0)
                .and_then(|inner| self.classify_expr(inner)),
            "method_invocation" => self.classify_collection(node).map(Expr::Collection),
            _ => None,
        }
    }

    /// `X.values()` or `[Owner.]merge(A.values(), B.values(), ...)`
    fn classify_collection(&self, node: Node) -> Option<Vec<String>> {
        let name = node.child_by_field_name("name").map(|n| self.node_text(n))?;
        let arguments = node.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let args: Vec<Node> = arguments
            .named_children(&mut cursor)
            .filter(|c| !is_comment(c.kind()))
            .collect();

        match name.as_str() {
            "values" if args.is_empty() => {
                let object = node.child_by_field_name("object")?;
                Some(vec![squash(&self.node_text(object))])
            }
            "merge" if !args.is_empty() => {
                let mut names = Vec::with_capacity(args.len());
                for arg in args {
                    if arg.kind() != "method_invocation" {
                        return None;
                    }
                    match self.classify_collection(arg)?.as_slice() {
                        [single] => names.push(single.clone()),
                        _ => return None,
                    }
                }
                Some(names)
            }
            _ => None,
        }
    }

    fn extract_type_list(&self, node: Node, out: &mut Vec<String>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_list" => self.extract_type_list(child, out),
                "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                    out.push(squash(&self.node_text(child)));
                }
                _ => {}
            }
        }
    }

    fn first_type_text(&self, node: Node) -> Option<String> {
        let mut cursor = node.walk();
        let found = node.named_children(&mut cursor).find(|c| {
            matches!(
                c.kind(),
                "type_identifier" | "scoped_type_identifier" | "generic_type"
            )
        });
        found.map(|c| squash(&self.node_text(c)))
    }

    fn extract_doc_comment(&self, node: Node) -> Option<String> {
        if !self.config.include_docs {
            return None;
        }
        // Look for the preceding javadoc block, skipping line comments
        let mut prev = node.prev_sibling();
        while let Some(sibling) = prev {
            match sibling.kind() {
                "line_comment" => prev = sibling.prev_sibling(),
                "block_comment" => {
                    let comment = self.node_text(sibling);
                    return comment.starts_with("/**").then_some(comment);
                }
                _ => return None,
            }
        }
        None
    }
}

fn type_kind(node_kind: &str) -> Option<TypeKind> {
    match node_kind {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" => Some(TypeKind::Record),
        "annotation_type_declaration" => Some(TypeKind::Annotation),
        _ => None,
    }
}

fn is_comment(kind: &str) -> bool {
    kind == "line_comment" || kind == "block_comment" || kind == "comment"
}

/// Remove whitespace inside dotted names and type arguments
fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Decode a Java string literal or text block into its value
pub(crate) fn string_value(literal: &str) -> String {
    if let Some(inner) = literal
        .strip_prefix("\"\"\"")
        .and_then(|s| s.strip_suffix("\"\"\""))
    {
        let lines: Vec<&str> = inner.lines().skip(1).collect();
        let indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
            .min()
            .unwrap_or(0);
        let joined: Vec<&str> = lines.iter().map(|l| strip_indent(l, indent)).collect();
        return unescape(joined.join("\n").trim_end_matches([' ', '\t']));
    }

    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    unescape(inner)
}

/// Drop up to `indent` leading whitespace characters
fn strip_indent(line: &str, indent: usize) -> &str {
    let end = line
        .char_indices()
        .take_while(|(_, c)| c.is_whitespace())
        .nth(indent)
        .map(|(i, _)| i)
        .unwrap_or_else(|| line.len() - line.trim_start().len());
    &line[end..]
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('s') => out.push(' '),
            Some('0') => out.push('\0'),
            Some('u') => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
