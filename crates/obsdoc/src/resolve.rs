//! Resolution of textual type and enum-constant references
//!
//! References appear in source as written by the author: `Foo`, `Outer.Foo`,
//! `pkg.Outer.Foo`, `pkg.Outer$Foo`, names brought in by (wildcard) imports or
//! names living in the same package. Resolution tries a fixed sequence of
//! rules and the first hit wins.

use obsdoc_parser_api::strip_generics;
use tracing::trace;

use crate::index::{ConstantHandle, SourceIndex, TypeId};

/// Resolves references relative to the type they are written in
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    index: &'a SourceIndex,
}

impl<'a> NameResolver<'a> {
    pub fn new(index: &'a SourceIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a SourceIndex {
        self.index
    }

    /// Resolve `reference` as written inside `enclosing`.
    ///
    /// Rules, in order: direct lookup, enclosing-name prefix, nested types,
    /// non-static imports, same package.
    pub fn resolve_type(&self, enclosing: TypeId, reference: &str) -> Option<TypeId> {
        let reference = strip_generics(reference);
        if reference.is_empty() {
            return None;
        }

        let resolved = self
            .index
            .lookup(reference)
            .or_else(|| self.by_enclosing_prefix(enclosing, reference))
            .or_else(|| self.in_nested_types(enclosing, reference))
            .or_else(|| self.via_imports(enclosing, reference))
            .or_else(|| self.in_package(enclosing, reference));

        trace!(
            enclosing = self.index.qualified_name(enclosing),
            reference,
            resolved = ?resolved.map(|id| self.index.qualified_name(id)),
            "Resolved type reference"
        );
        resolved
    }

    /// `Outer.Inner` written inside `Outer`
    fn by_enclosing_prefix(&self, enclosing: TypeId, reference: &str) -> Option<TypeId> {
        let simple = self.index.simple_name(enclosing);
        let rest = reference
            .strip_prefix(simple)
            .and_then(|rest| rest.strip_prefix('.').or_else(|| rest.strip_prefix('$')))?;
        if rest.is_empty() {
            return None;
        }

        let nested = format!(
            "{}${}",
            self.index.qualified_name(enclosing),
            rest.replace('.', "$")
        );
        let canonical = format!(
            "{}.{}",
            self.index.canonical_name(enclosing),
            rest.replace('$', ".")
        );
        self.index
            .lookup(&nested)
            .or_else(|| self.index.lookup(&canonical))
    }

    /// Depth-first search through the types nested in `enclosing`
    fn in_nested_types(&self, enclosing: TypeId, reference: &str) -> Option<TypeId> {
        self.index.nested_types(enclosing).iter().find_map(|&nested| {
            let matches = self.index.simple_name(nested) == reference
                || self.index.canonical_name(nested) == reference
                || self.index.qualified_name(nested) == reference;
            if matches {
                Some(nested)
            } else {
                self.in_nested_types(nested, reference)
            }
        })
    }

    /// Single-type imports shadow wildcard imports
    fn via_imports(&self, enclosing: TypeId, reference: &str) -> Option<TypeId> {
        let unit = self.index.unit_of(enclosing);
        let (first, rest) = match reference.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (reference, None),
        };
        let imports = || unit.imports.iter().filter(|i| !i.is_static);

        let exact = imports().filter(|i| !i.is_wildcard).find_map(|import| {
            if import.name == reference || import.simple_name() == reference {
                self.index.lookup(&import.name)
            } else if let Some(rest) = rest.filter(|_| import.simple_name() == first) {
                self.index.lookup(&format!("{}.{}", import.name, rest))
            } else {
                None
            }
        });
        if exact.is_some() {
            return exact;
        }

        imports().filter(|i| i.is_wildcard).find_map(|import| {
            self.index
                .lookup(&format!("{}.{}", import.name, reference))
                .or_else(|| {
                    self.index
                        .types_in_package(&import.name)
                        .iter()
                        .copied()
                        .find(|&id| self.index.simple_name(id) == reference)
                })
        })
    }

    fn in_package(&self, enclosing: TypeId, reference: &str) -> Option<TypeId> {
        let package = self.index.package_of(enclosing).unwrap_or_default();
        if !package.is_empty() {
            if let Some(found) = self.index.lookup(&format!("{package}.{reference}")) {
                return Some(found);
            }
        }
        self.index
            .types_in_package(package)
            .iter()
            .copied()
            .find(|&id| self.index.simple_name(id) == reference)
    }

    /// Resolve an enum constant written as `Enum.CONSTANT` or as a bare
    /// static-imported `CONSTANT`.
    ///
    /// Bare names fall back to the enclosing type's own constants when no
    /// static import provides them.
    pub fn resolve_enum_constant(
        &self,
        enclosing: TypeId,
        expression: &str,
    ) -> Option<ConstantHandle> {
        let expression = expression.trim();

        if let Some((qualifier, name)) = expression.rsplit_once('.') {
            let owner = self.resolve_type(enclosing, qualifier)?;
            return self.index.find_constant(owner, name);
        }

        let unit = self.index.unit_of(enclosing);
        for import in unit.imports.iter().filter(|i| i.is_static) {
            let owner_name = if import.is_wildcard {
                Some(import.name.as_str())
            } else if import.simple_name() == expression {
                import.parent_name()
            } else {
                None
            };

            let found = owner_name
                .and_then(|owner| self.resolve_type(enclosing, owner))
                .and_then(|owner| self.index.find_constant(owner, expression));
            if found.is_some() {
                return found;
            }
        }

        self.index.find_constant(enclosing, expression)
    }
}
