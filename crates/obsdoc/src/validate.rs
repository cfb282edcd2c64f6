//! Aggregated validation of extracted entries

use serde::Serialize;
use std::fmt;

use crate::entry::DocumentedEntry;
use crate::error::{DocsError, Result};

/// What is wrong with an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// Both `getName()` and `getDefaultConvention()` are declared
    BothNameAndConvention,
    /// Neither `getName()` nor `getDefaultConvention()` is declared
    NeitherNameNorConvention,
    EmptyDescription,
    /// Keys that do not start with the declared prefix
    InvalidPrefix { prefix: String, keys: Vec<String> },
}

/// One invalid entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub class: String,
    pub constant: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(class: impl Into<String>, constant: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            class: class.into(),
            constant: constant.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: ", self.class, self.constant)?;
        match &self.kind {
            ViolationKind::BothNameAndConvention => f.write_str(
                "declares both getName() and getDefaultConvention(); only one of them is allowed",
            ),
            ViolationKind::NeitherNameNorConvention => f.write_str(
                "declares neither getName() nor getDefaultConvention(); one of them is required",
            ),
            ViolationKind::EmptyDescription => {
                f.write_str("has no description; document the constant with a javadoc")
            }
            ViolationKind::InvalidPrefix { prefix, keys } => write!(
                f,
                "keys must start with the prefix '{}' but [{}] do not",
                prefix,
                keys.join(", ")
            ),
        }
    }
}

/// Every invariant violation of a single entry
pub fn violations_of<E: DocumentedEntry>(entry: &E) -> Vec<Violation> {
    let mut kinds = Vec::new();

    match (entry.name().is_some(), entry.convention_class().is_some()) {
        (true, true) => kinds.push(ViolationKind::BothNameAndConvention),
        (false, false) => kinds.push(ViolationKind::NeitherNameNorConvention),
        _ => {}
    }

    if entry.description().trim().is_empty() {
        kinds.push(ViolationKind::EmptyDescription);
    }

    if let Some(prefix) = entry.prefix().filter(|p| !p.is_empty()) {
        let keys: Vec<String> = entry
            .key_names()
            .into_iter()
            .filter(|key| !key.name.starts_with(prefix))
            .map(|key| key.name.clone())
            .collect();
        if !keys.is_empty() {
            kinds.push(ViolationKind::InvalidPrefix {
                prefix: prefix.to_string(),
                keys,
            });
        }
    }

    kinds
        .into_iter()
        .map(|kind| Violation::new(entry.enclosing_class(), entry.enum_name(), kind))
        .collect()
}

/// Collect violations across all entries; fail once with all of them
pub fn validate<'e, E, I>(entries: I) -> Result<()>
where
    E: DocumentedEntry + 'e,
    I: IntoIterator<Item = &'e E>,
{
    let violations: Vec<Violation> = entries.into_iter().flat_map(violations_of).collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(DocsError::Validation(violations))
    }
}

/// Validate metrics and spans together so one run reports every problem
pub fn validate_all<M, S>(metrics: &[M], spans: &[S]) -> Result<()>
where
    M: DocumentedEntry,
    S: DocumentedEntry,
{
    let mut violations: Vec<Violation> = metrics.iter().flat_map(violations_of).collect();
    for violation in spans.iter().flat_map(violations_of) {
        if !violations.contains(&violation) {
            violations.push(violation);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DocsError::Validation(violations))
    }
}
