//! Discovery of documentation enums and observation conventions

use obsdoc_parser_api::{strip_generics, TypeKind};
use tracing::{debug, instrument, warn};

use crate::entry::{ConventionKind, ObservationConventionEntry};
use crate::error::{DocsError, Result};
use crate::index::{FileId, SourceIndex, TypeId};
use crate::marker::MarkerSpec;
use crate::resolve::NameResolver;

const LOCAL_CONVENTION: &[&str] = &[
    "ObservationConvention",
    "io.micrometer.observation.ObservationConvention",
];
const GLOBAL_CONVENTION: &[&str] = &[
    "GlobalObservationConvention",
    "io.micrometer.observation.GlobalObservationConvention",
];

/// Context class name used when a convention declares no type argument
pub const UNKNOWN_CONTEXT: &str = "Unknown";

/// One documentation constant to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub owner: TypeId,
    /// Position of the constant in the enum
    pub constant: usize,
    pub spec: MarkerSpec,
}

/// Finds the constants of documentation enums
#[derive(Debug, Clone, Copy)]
pub struct MarkerScanner<'a> {
    index: &'a SourceIndex,
}

impl<'a> MarkerScanner<'a> {
    pub fn new(index: &'a SourceIndex) -> Self {
        Self { index }
    }

    /// Candidates declared by the file's root type.
    ///
    /// Only an enum implementing a documentation marker contributes. Methods
    /// declared on such an enum itself are a configuration error.
    #[instrument(skip_all, fields(file = file.index()))]
    pub fn scan(&self, file: FileId) -> Result<Vec<Candidate>> {
        let Some(owner) = self.index.primary_type(file) else {
            return Ok(Vec::new());
        };
        let decl = self.index.resolve(owner)?;
        if decl.kind != TypeKind::Enum {
            return Ok(Vec::new());
        }

        let Some(spec) = MarkerSpec::of_type(decl).filter(|s| s.is_documentation()) else {
            debug!(
                class = %decl.qualified_name,
                "Enum does not implement a documentation marker"
            );
            return Ok(Vec::new());
        };

        if !decl.methods.is_empty() {
            return Err(DocsError::EnumLevelMethod {
                class: decl.canonical_name.clone(),
                methods: decl.methods.iter().map(|m| m.name.clone()).collect(),
            });
        }

        let candidates: Vec<_> = decl
            .constants
            .iter()
            .enumerate()
            .filter(|(_, constant)| {
                if constant.methods.is_empty() {
                    debug!(constant = %constant.name, "Skipping constant without accessors");
                }
                !constant.methods.is_empty()
            })
            .map(|(position, _)| Candidate {
                owner,
                constant: position,
                spec,
            })
            .collect();

        debug!(
            class = %decl.qualified_name,
            %spec,
            candidates = candidates.len(),
            "Scanned documentation enum"
        );
        Ok(candidates)
    }

    /// The observation convention implemented by the file's root class, if any
    pub fn scan_conventions(&self, file: FileId) -> Result<Option<ObservationConventionEntry>> {
        let Some(owner) = self.index.primary_type(file) else {
            return Ok(None);
        };
        let decl = self.index.resolve(owner)?;
        if !matches!(decl.kind, TypeKind::Class | TypeKind::Record) {
            return Ok(None);
        }

        for interface in &decl.interfaces {
            let name = strip_generics(interface);
            let kind = if GLOBAL_CONVENTION.contains(&name) {
                ConventionKind::Global
            } else if LOCAL_CONVENTION.contains(&name) {
                ConventionKind::Local
            } else {
                continue;
            };

            let context_class_name = match type_argument(interface) {
                Some(context) => NameResolver::new(self.index)
                    .resolve_type(owner, context)
                    .map(|id| self.index.canonical_name(id).to_string())
                    .unwrap_or_else(|| context.to_string()),
                None => {
                    warn!(
                        class = %decl.canonical_name,
                        "Convention declares no context type argument"
                    );
                    UNKNOWN_CONTEXT.to_string()
                }
            };

            return Ok(Some(ObservationConventionEntry {
                class_name: decl.canonical_name.clone(),
                kind,
                context_class_name,
            }));
        }
        Ok(None)
    }
}

/// `Foo<Bar.Context>` yields `Bar.Context`
fn type_argument(raw: &str) -> Option<&str> {
    let start = raw.find('<')?;
    let end = raw.rfind('>')?;
    let argument = raw.get(start + 1..end)?.trim();
    (!argument.is_empty()).then_some(argument)
}
