use serde::{Deserialize, Serialize};

/// The value shapes a marker accessor may return.
///
/// Parsers classify the single returned expression of an accessor body into
/// one of these; everything else becomes [`MethodBody::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// `"http.server.requests"`
    StringLiteral(String),

    /// `true` / `false`
    Boolean(bool),

    /// `Foo.class`, holds the type as written (`Foo`, `Outer.Foo`)
    TypeReference(String),

    /// `Meter.Type.TIMER` or a bare static-imported `TIMER`
    QualifiedName(String),

    /// `X.values()` yields `[X]`, `merge(A.values(), B.values())` yields `[A, B]`
    Collection(Vec<String>),

    /// `null`
    Null,
}

impl Expr {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::StringLiteral(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expr::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_type_reference(&self) -> Option<&str> {
        match self {
            Expr::TypeReference(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_qualified_name(&self) -> Option<&str> {
        match self {
            Expr::QualifiedName(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[String]> {
        match self {
            Expr::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Short label used in log messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::StringLiteral(_) => "string literal",
            Expr::Boolean(_) => "boolean literal",
            Expr::TypeReference(_) => "type reference",
            Expr::QualifiedName(_) => "qualified name",
            Expr::Collection(_) => "collection expression",
            Expr::Null => "null",
        }
    }
}

/// Body of a method declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodBody {
    /// No body (abstract or interface method)
    Abstract,

    /// Exactly one `return <expr>;` statement with a supported expression
    Return(Expr),

    /// Any other body, kept as raw text for diagnostics
    Unsupported(String),
}

impl MethodBody {
    pub fn returned(&self) -> Option<&Expr> {
        match self {
            MethodBody::Return(expr) => Some(expr),
            _ => None,
        }
    }
}
