//! Per-constant extraction of metric and span entries
//!
//! Each documentation constant overrides a handful of accessor methods whose
//! bodies return a single literal. The accessor table of the constant's
//! [`MarkerSpec`] decides what every method contributes to the entry.

mod collection;
pub mod javadoc;

use obsdoc_parser_api::{EnumConstant, Expr, MethodBody, MethodDecl};
use tracing::{debug, warn};

use crate::entry::{
    EventEntry, KeyNameEntry, MeterType, MetricEntry, OverrideRef, SpanEntry,
};
use crate::error::{DocsError, Result};
use crate::hierarchy::HierarchyResolver;
use crate::index::{SourceIndex, TypeId};
use crate::marker::{Accessor, KeySlot, MarkerSpec};
use crate::resolve::NameResolver;
use crate::scanner::Candidate;

/// Where an accessor is declared, for resolution and messages
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site<'s> {
    pub owner: TypeId,
    pub class: &'s str,
    pub constant: &'s str,
}

/// Entries produced from one or more constants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub metrics: Vec<MetricEntry>,
    pub spans: Vec<SpanEntry>,
}

impl Extracted {
    pub fn merge(&mut self, other: Extracted) {
        self.metrics.extend(other.metrics);
        self.spans.extend(other.spans);
    }
}

/// Keys read from an override source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InheritedKeys {
    pub low_cardinality: Vec<KeyNameEntry>,
    pub high_cardinality: Vec<KeyNameEntry>,
}

/// Accessor values of one constant
#[derive(Debug, Clone, Default)]
struct ConstantFacts {
    name: Option<String>,
    convention_class: Option<String>,
    name_from_convention_class: Option<String>,
    contextual_name: Option<String>,
    prefix: Option<String>,
    base_unit: Option<String>,
    meter_type: Option<MeterType>,
    low_cardinality: Vec<KeyNameEntry>,
    high_cardinality: Vec<KeyNameEntry>,
    additional: Vec<KeyNameEntry>,
    events: Vec<EventEntry>,
    overrides: Option<OverrideRef>,
}

impl ConstantFacts {
    fn keys_mut(&mut self, slot: KeySlot) -> &mut Vec<KeyNameEntry> {
        match slot {
            KeySlot::LowCardinality => &mut self.low_cardinality,
            KeySlot::HighCardinality => &mut self.high_cardinality,
            KeySlot::Additional => &mut self.additional,
        }
    }
}

/// Turns documentation constants into entries
#[derive(Debug, Clone, Copy)]
pub struct EntryExtractor<'a> {
    index: &'a SourceIndex,
    names: NameResolver<'a>,
    hierarchy: HierarchyResolver<'a>,
}

impl<'a> EntryExtractor<'a> {
    pub fn new(index: &'a SourceIndex) -> Self {
        Self {
            index,
            names: NameResolver::new(index),
            hierarchy: HierarchyResolver::new(index),
        }
    }

    /// Extract the entries one documentation constant declares
    pub fn extract(&self, candidate: &Candidate) -> Result<Extracted> {
        let decl = self.index.resolve(candidate.owner)?;
        let constant = decl.constants.get(candidate.constant).ok_or_else(|| {
            DocsError::internal(format!(
                "constant #{} missing from {}",
                candidate.constant, decl.qualified_name
            ))
        })?;
        let site = Site {
            owner: candidate.owner,
            class: &decl.canonical_name,
            constant: &constant.name,
        };

        let facts = self.read_facts(site, candidate.spec, constant)?;
        let description = describe(constant);
        debug!(
            class = site.class,
            constant = site.constant,
            spec = %candidate.spec,
            "Extracted documentation constant"
        );
        Ok(shape(candidate.spec, site, facts, description))
    }

    fn read_facts(
        &self,
        site: Site<'_>,
        spec: MarkerSpec,
        constant: &EnumConstant,
    ) -> Result<ConstantFacts> {
        let mut facts = ConstantFacts::default();

        for method in &constant.methods {
            let Some(accessor) = spec.accessor(&method.name) else {
                debug!(
                    class = site.class,
                    constant = site.constant,
                    method = %method.name,
                    "Ignoring method outside the accessor table"
                );
                continue;
            };
            let Some(expr) = returned(site, method) else {
                continue;
            };

            match accessor {
                Accessor::Name => facts.name = string_value(site, method, expr),
                Accessor::ContextualName => facts.contextual_name = string_value(site, method, expr),
                Accessor::Prefix => facts.prefix = string_value(site, method, expr),
                Accessor::BaseUnit => facts.base_unit = string_value(site, method, expr),
                Accessor::DefaultConvention => self.read_convention(site, method, expr, &mut facts),
                Accessor::KeyNames(slot) => {
                    let keys = self.key_names(site, method, expr)?;
                    facts.keys_mut(slot).extend(keys);
                }
                Accessor::Events => {
                    let events = self.events(site, method, expr)?;
                    facts.events.extend(events);
                }
                Accessor::MeterType => facts.meter_type = meter_type(site, method, expr),
                Accessor::Overrides => facts.overrides = self.override_ref(site, method, expr),
                Accessor::Required => {}
            }
        }

        Ok(facts)
    }

    fn read_convention(
        &self,
        site: Site<'_>,
        method: &MethodDecl,
        expr: &Expr,
        facts: &mut ConstantFacts,
    ) {
        let Some(reference) = expr.as_type_reference() else {
            unsupported(site, method, expr);
            return;
        };

        let Some(convention) = self.names.resolve_type(site.owner, reference) else {
            warn!(
                class = site.class,
                constant = site.constant,
                convention = reference,
                "Convention class not found in the source tree, keeping it as written"
            );
            facts.convention_class = Some(reference.to_string());
            return;
        };

        facts.convention_class = Some(self.index.canonical_name(convention).to_string());
        facts.name_from_convention_class = self
            .hierarchy
            .find_method_decl(convention, "getName")
            .and_then(|m| m.body.returned())
            .and_then(Expr::as_str)
            .map(str::to_string);
        if facts.name_from_convention_class.is_none() {
            debug!(
                convention = self.index.canonical_name(convention),
                "Convention name is computed at runtime"
            );
        }
    }

    fn override_ref(&self, site: Site<'_>, method: &MethodDecl, expr: &Expr) -> Option<OverrideRef> {
        let Some(expression) = expr.as_qualified_name() else {
            unsupported(site, method, expr);
            return None;
        };

        match self.names.resolve_enum_constant(site.owner, expression) {
            Some(handle) => {
                let constant = self.index.constant(handle)?;
                Some(OverrideRef::new(
                    self.index.canonical_name(handle.owner),
                    constant.name.clone(),
                ))
            }
            None => {
                warn!(
                    class = site.class,
                    constant = site.constant,
                    reference = expression,
                    "Override source not found, ignoring it"
                );
                None
            }
        }
    }

    /// Read the key-name accessors of the constant an entry overrides.
    ///
    /// Only the referenced constant's own accessors are read; its own override
    /// reference is not followed.
    pub fn inherited_keys(&self, source: &OverrideRef) -> Result<InheritedKeys> {
        let mut inherited = InheritedKeys::default();
        let Some(owner) = self.index.lookup(&source.enclosing_class) else {
            return Ok(inherited);
        };
        let decl = self.index.resolve(owner)?;
        let (Some(spec), Some(constant)) = (MarkerSpec::of_type(decl), decl.constant(&source.enum_name))
        else {
            return Ok(inherited);
        };
        let site = Site {
            owner,
            class: &decl.canonical_name,
            constant: &constant.name,
        };

        for &(accessor, slot) in spec.key_accessors() {
            let Some(method) = constant.method(accessor) else {
                continue;
            };
            let Some(expr) = returned(site, method) else {
                continue;
            };
            let keys = self.key_names(site, method, expr)?;
            match slot {
                KeySlot::HighCardinality => inherited.high_cardinality.extend(keys),
                _ => inherited.low_cardinality.extend(keys),
            }
        }
        Ok(inherited)
    }
}

/// Build the entries a documentation marker declares
fn shape(spec: MarkerSpec, site: Site<'_>, facts: ConstantFacts, description: String) -> Extracted {
    let metric = |meter_type: MeterType, observation: bool| MetricEntry {
        name: facts.name.clone(),
        name_from_convention_class: facts.name_from_convention_class.clone(),
        convention_class: facts.convention_class.clone(),
        enclosing_class: site.class.to_string(),
        enum_name: site.constant.to_string(),
        description: description.clone(),
        prefix: facts.prefix.clone(),
        base_unit: facts.base_unit.clone(),
        meter_type,
        low_cardinality_keys: facts.low_cardinality.clone(),
        high_cardinality_keys: facts.high_cardinality.clone(),
        additional_keys: facts.additional.clone(),
        events: facts.events.clone(),
        overrides_default_metric_from: facts.overrides.clone(),
        observation,
    };
    let span = || SpanEntry {
        name: facts.name.clone(),
        contextual_name: facts.contextual_name.clone(),
        name_from_convention_class: facts.name_from_convention_class.clone(),
        convention_class: facts.convention_class.clone(),
        enclosing_class: site.class.to_string(),
        enum_name: site.constant.to_string(),
        description: description.clone(),
        prefix: facts.prefix.clone(),
        tag_keys: facts
            .low_cardinality
            .iter()
            .chain(&facts.high_cardinality)
            .cloned()
            .collect(),
        additional_keys: facts.additional.clone(),
        events: facts.events.clone(),
        overrides_default_span_from: facts.overrides.clone(),
    };

    match spec {
        MarkerSpec::MeterDocumentation => Extracted {
            metrics: vec![metric(facts.meter_type.unwrap_or(MeterType::Other), false)],
            spans: Vec::new(),
        },
        MarkerSpec::SpanDocumentation => Extracted {
            metrics: Vec::new(),
            spans: vec![span()],
        },
        MarkerSpec::ObservationDocumentation => Extracted {
            metrics: vec![metric(MeterType::Timer, true)],
            spans: vec![span()],
        },
        MarkerSpec::KeyName | MarkerSpec::EventValue => Extracted::default(),
    }
}

/// Cleaned javadoc of a constant, empty when it has none
pub(crate) fn describe(constant: &EnumConstant) -> String {
    constant
        .doc_comment
        .as_deref()
        .map(javadoc::clean)
        .unwrap_or_default()
}

/// The expression a supported accessor body returns
pub(crate) fn returned<'m>(site: Site<'_>, method: &'m MethodDecl) -> Option<&'m Expr> {
    match &method.body {
        MethodBody::Return(expr) => Some(expr),
        MethodBody::Abstract => None,
        MethodBody::Unsupported(body) => {
            warn!(
                class = site.class,
                constant = site.constant,
                method = %method.name,
                body = %body,
                "Accessor body is not a single literal return, treating it as absent"
            );
            None
        }
    }
}

pub(crate) fn unsupported(site: Site<'_>, method: &MethodDecl, expr: &Expr) {
    warn!(
        class = site.class,
        constant = site.constant,
        method = %method.name,
        found = expr.kind(),
        "Accessor returns an unexpected value, treating it as absent"
    );
}

fn string_value(site: Site<'_>, method: &MethodDecl, expr: &Expr) -> Option<String> {
    match expr {
        Expr::StringLiteral(value) => Some(value.clone()),
        Expr::Null => None,
        other => {
            unsupported(site, method, other);
            None
        }
    }
}

fn meter_type(site: Site<'_>, method: &MethodDecl, expr: &Expr) -> Option<MeterType> {
    let Some(name) = expr.as_qualified_name() else {
        unsupported(site, method, expr);
        return None;
    };
    Some(MeterType::from_constant(name).unwrap_or_else(|| {
        warn!(
            class = site.class,
            constant = site.constant,
            meter_type = name,
            "Unknown meter type, documenting it as other"
        );
        MeterType::Other
    }))
}
