//! Method lookup through superclass and interface chains

use obsdoc_parser_api::{strip_generics, MethodDecl};
use std::collections::HashSet;
use tracing::trace;

use crate::index::{MethodHandle, SourceIndex, TypeId};
use crate::resolve::NameResolver;

/// Finds methods a type declares or inherits
#[derive(Debug, Clone, Copy)]
pub struct HierarchyResolver<'a> {
    names: NameResolver<'a>,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(index: &'a SourceIndex) -> Self {
        Self {
            names: NameResolver::new(index),
        }
    }

    /// Depth-first: own methods, then the superclass chain, then each
    /// interface in declaration order. The first match wins.
    pub fn find_method(&self, ty: TypeId, name: &str) -> Option<MethodHandle> {
        let mut visited = HashSet::new();
        self.search(ty, name, &mut visited)
    }

    /// Convenience wrapper returning the declaration itself
    pub fn find_method_decl(&self, ty: TypeId, name: &str) -> Option<&'a MethodDecl> {
        let handle = self.find_method(ty, name)?;
        self.names.index().method(handle)
    }

    fn search(&self, ty: TypeId, name: &str, visited: &mut HashSet<TypeId>) -> Option<MethodHandle> {
        if !visited.insert(ty) {
            return None;
        }
        let index = self.names.index();
        let decl = index.resolve(ty).ok()?;

        if let Some(position) = decl.methods.iter().position(|m| m.name == name) {
            trace!(owner = index.qualified_name(ty), method = name, "Found method");
            return Some(MethodHandle {
                owner: ty,
                index: position,
            });
        }

        let superclass = decl
            .superclass
            .as_deref()
            .filter(|s| !is_root_type(strip_generics(s)))
            .and_then(|s| self.resolve_supertype(ty, s));
        if let Some(found) = superclass.and_then(|sup| self.search(sup, name, visited)) {
            return Some(found);
        }

        decl.interfaces
            .iter()
            .filter_map(|i| self.resolve_supertype(ty, i))
            .find_map(|iface| self.search(iface, name, visited))
    }

    /// Try the supertype as written, without generics, and with its last
    /// segment treated as a nested type (`a.Outer.Inner` as `a.Outer$Inner`).
    fn resolve_supertype(&self, ty: TypeId, raw: &str) -> Option<TypeId> {
        let base = strip_generics(raw);
        let nested = base
            .rsplit_once('.')
            .map(|(outer, inner)| format!("{outer}${inner}"));
        let mut candidates = vec![raw.trim(), base];
        if let Some(nested) = nested.as_deref() {
            candidates.push(nested);
        }

        candidates
            .into_iter()
            .find_map(|candidate| self.names.resolve_type(ty, candidate))
    }
}

fn is_root_type(name: &str) -> bool {
    name == "Object" || name == "java.lang.Object"
}
