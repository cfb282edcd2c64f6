use crate::expr::{Expr, MethodBody};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// An import declaration as written in the file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Imported name without the trailing `.*` of wildcard imports
    pub name: String,

    /// `import static ...`
    pub is_static: bool,

    /// `import a.b.*`
    pub is_wildcard: bool,
}

impl ImportDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            is_wildcard: false,
        }
    }

    pub fn static_import(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.is_wildcard = true;
        self
    }

    /// Last dot-separated segment of the imported name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Everything before the last segment (the declaring type of a static import)
    pub fn parent_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }
}

/// A method declaration reduced to what accessor evaluation needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,

    pub parameter_count: usize,

    pub body: MethodBody,

    pub doc_comment: Option<String>,

    /// Starting line number (1-indexed)
    pub line_start: usize,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, body: MethodBody) -> Self {
        Self {
            name: name.into(),
            parameter_count: 0,
            body,
            doc_comment: None,
            line_start: 0,
        }
    }

    /// Shorthand for a method whose body is `return <expr>;`
    pub fn returning(name: impl Into<String>, expr: Expr) -> Self {
        Self::new(name, MethodBody::Return(expr))
    }

    pub fn with_parameters(mut self, count: usize) -> Self {
        self.parameter_count = count;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line_start = line;
        self
    }
}

/// One enum constant with the methods declared in its own class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: String,

    pub doc_comment: Option<String>,

    pub methods: Vec<MethodDecl>,

    /// Line number (1-indexed)
    pub line: usize,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_comment: None,
            methods: Vec::new(),
            line: 0,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// First method with the given name
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A declared type with its nested types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeKind,

    /// `Inner`
    pub simple_name: String,

    /// `pkg.Outer$Inner`
    pub qualified_name: String,

    /// `pkg.Outer.Inner`
    pub canonical_name: String,

    /// Superclass as written, generics included
    pub superclass: Option<String>,

    /// Implemented (or, for interfaces, extended) interfaces as written
    pub interfaces: Vec<String>,

    /// Methods declared directly in the type body
    pub methods: Vec<MethodDecl>,

    /// Enum constants in declaration order
    pub constants: Vec<EnumConstant>,

    pub nested: Vec<TypeDecl>,

    pub doc_comment: Option<String>,

    /// Starting line number (1-indexed)
    pub line_start: usize,

    /// Ending line number (1-indexed)
    pub line_end: usize,
}

impl TypeDecl {
    /// Create a top-level type in `package`
    pub fn new(kind: TypeKind, package: Option<&str>, simple_name: impl Into<String>) -> Self {
        let simple_name = simple_name.into();
        let qualified = match package {
            Some(pkg) if !pkg.is_empty() => format!("{pkg}.{simple_name}"),
            _ => simple_name.clone(),
        };
        Self {
            kind,
            qualified_name: qualified.clone(),
            canonical_name: qualified,
            simple_name,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            constants: Vec::new(),
            nested: Vec::new(),
            doc_comment: None,
            line_start: 0,
            line_end: 0,
        }
    }

    /// Create a type nested directly inside `self` (not yet attached)
    pub fn nested_type(&self, kind: TypeKind, simple_name: impl Into<String>) -> TypeDecl {
        let simple_name = simple_name.into();
        let mut decl = TypeDecl::new(kind, None, simple_name.clone());
        decl.qualified_name = format!("{}${}", self.qualified_name, simple_name);
        decl.canonical_name = format!("{}.{}", self.canonical_name, simple_name);
        decl
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constant(mut self, constant: EnumConstant) -> Self {
        self.constants.push(constant);
        self
    }

    pub fn with_nested(mut self, nested: TypeDecl) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// First declared method with the given name
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Constant with the given name
    pub fn constant(&self, name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// Interface names with generic arguments removed
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(|i| strip_generics(i))
    }

    /// Number of types in this subtree, `self` included
    pub fn type_count(&self) -> usize {
        1 + self.nested.iter().map(TypeDecl::type_count).sum::<usize>()
    }
}

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub file_path: PathBuf,

    pub package: Option<String>,

    pub imports: Vec<ImportDecl>,

    /// Top-level types in declaration order
    pub types: Vec<TypeDecl>,
}

impl SourceUnit {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            package: None,
            imports: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_import(mut self, import: ImportDecl) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Index of the root type within `types`: the one named after the file,
    /// otherwise the first declared.
    pub fn primary_index(&self) -> Option<usize> {
        let stem = self.file_path.file_stem().and_then(|s| s.to_str());
        stem.and_then(|stem| self.types.iter().position(|t| t.simple_name == stem))
            .or(if self.types.is_empty() { None } else { Some(0) })
    }

    /// The file's root type
    pub fn primary(&self) -> Option<&TypeDecl> {
        self.primary_index().map(|i| &self.types[i])
    }

    /// Total declared types, nested included
    pub fn type_count(&self) -> usize {
        self.types.iter().map(TypeDecl::type_count).sum()
    }
}

/// Remove a generic argument suffix: `Foo<Bar<Baz>>` becomes `Foo`.
pub fn strip_generics(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => name[..idx].trim(),
        None => name.trim(),
    }
}
