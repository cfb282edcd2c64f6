//! Key names and events referenced through `X.values()` collections

use obsdoc_parser_api::{EnumConstant, Expr, MethodDecl, TypeDecl};
use tracing::warn;

use super::{describe, unsupported, EntryExtractor, Site};
use crate::entry::{EventEntry, KeyNameEntry};
use crate::error::{DocsError, Result};
use crate::marker::MarkerSpec;

impl EntryExtractor<'_> {
    /// Every key of every enum the collection expression names
    pub(crate) fn key_names(
        &self,
        site: Site<'_>,
        method: &MethodDecl,
        expr: &Expr,
    ) -> Result<Vec<KeyNameEntry>> {
        let mut keys = Vec::new();
        for decl in self.referenced_enums(site, method, expr, MarkerSpec::KeyName)? {
            for constant in &decl.constants {
                keys.push(key_name_entry(decl, constant)?);
            }
        }
        Ok(keys)
    }

    /// Every event of every enum the collection expression names
    pub(crate) fn events(
        &self,
        site: Site<'_>,
        method: &MethodDecl,
        expr: &Expr,
    ) -> Result<Vec<EventEntry>> {
        let mut events = Vec::new();
        for decl in self.referenced_enums(site, method, expr, MarkerSpec::EventValue)? {
            for constant in &decl.constants {
                events.push(event_entry(decl, constant)?);
            }
        }
        Ok(events)
    }

    /// Resolve the enums of a collection expression and check they carry `marker`
    fn referenced_enums(
        &self,
        site: Site<'_>,
        method: &MethodDecl,
        expr: &Expr,
        marker: MarkerSpec,
    ) -> Result<Vec<&TypeDecl>> {
        let Some(references) = expr.as_collection() else {
            if *expr != Expr::Null {
                unsupported(site, method, expr);
            }
            return Ok(Vec::new());
        };

        let mut enums = Vec::with_capacity(references.len());
        for reference in references {
            let Some(id) = self.names.resolve_type(site.owner, reference) else {
                warn!(
                    class = site.class,
                    constant = site.constant,
                    method = %method.name,
                    reference = %reference,
                    "Referenced enum not found in the source tree, skipping it"
                );
                continue;
            };
            let decl = self.index.resolve(id)?;
            if !marker.implemented_by(decl) {
                return Err(DocsError::not_a_marker(
                    site.class,
                    site.constant,
                    &decl.canonical_name,
                    marker.name(),
                ));
            }
            enums.push(decl);
        }
        Ok(enums)
    }
}

fn literal<'c>(constant: &'c EnumConstant, accessor: &str) -> Option<&'c str> {
    constant
        .method(accessor)
        .and_then(|m| m.body.returned())
        .and_then(Expr::as_str)
}

fn key_name_entry(decl: &TypeDecl, constant: &EnumConstant) -> Result<KeyNameEntry> {
    let name = literal(constant, "asString").ok_or_else(|| {
        DocsError::missing_accessor(
            &decl.canonical_name,
            &constant.name,
            "asString",
            "string literal",
        )
    })?;
    let required = constant
        .method("isRequired")
        .and_then(|m| m.body.returned())
        .and_then(Expr::as_bool)
        != Some(false);

    Ok(KeyNameEntry {
        name: name.to_string(),
        description: describe(constant),
        required,
        enclosing_class: decl.canonical_name.clone(),
        enum_name: constant.name.clone(),
    })
}

fn event_entry(decl: &TypeDecl, constant: &EnumConstant) -> Result<EventEntry> {
    let name = literal(constant, "getName")
        .or_else(|| literal(constant, "getValue"))
        .ok_or_else(|| {
            DocsError::missing_accessor(
                &decl.canonical_name,
                &constant.name,
                "getName",
                "string literal",
            )
        })?;
    let contextual_name = literal(constant, "getContextualName").unwrap_or(name);

    Ok(EventEntry {
        name: name.to_string(),
        contextual_name: contextual_name.to_string(),
        description: describe(constant),
        enclosing_class: decl.canonical_name.clone(),
        enum_name: constant.name.clone(),
    })
}
