//! Extracted documentation entries

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A documented key (tag) name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyNameEntry {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Canonical name of the enum declaring the key
    pub enclosing_class: String,
    pub enum_name: String,
}

/// A documented event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub name: String,
    pub contextual_name: String,
    pub description: String,
    pub enclosing_class: String,
    pub enum_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeterType {
    Counter,
    Gauge,
    LongTaskTimer,
    Timer,
    DistributionSummary,
    Other,
}

impl MeterType {
    /// Map the last segment of `Meter.Type.X` to a meter type
    pub fn from_constant(name: &str) -> Option<MeterType> {
        let constant = name.rsplit('.').next().unwrap_or(name);
        match constant {
            "COUNTER" => Some(MeterType::Counter),
            "GAUGE" => Some(MeterType::Gauge),
            "LONG_TASK_TIMER" => Some(MeterType::LongTaskTimer),
            "TIMER" => Some(MeterType::Timer),
            "DISTRIBUTION_SUMMARY" => Some(MeterType::DistributionSummary),
            "OTHER" => Some(MeterType::Other),
            _ => None,
        }
    }

    /// Human readable label, as used in generated docs
    pub fn label(self) -> &'static str {
        match self {
            MeterType::Counter => "counter",
            MeterType::Gauge => "gauge",
            MeterType::LongTaskTimer => "long task timer",
            MeterType::Timer => "timer",
            MeterType::DistributionSummary => "distribution summary",
            MeterType::Other => "other",
        }
    }
}

impl fmt::Display for MeterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference to the enum constant an entry takes its default keys from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverrideRef {
    pub enclosing_class: String,
    pub enum_name: String,
}

impl OverrideRef {
    pub fn new(enclosing_class: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self {
            enclosing_class: enclosing_class.into(),
            enum_name: enum_name.into(),
        }
    }
}

impl fmt::Display for OverrideRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enclosing_class, self.enum_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub name: Option<String>,
    pub name_from_convention_class: Option<String>,
    pub convention_class: Option<String>,
    pub enclosing_class: String,
    pub enum_name: String,
    pub description: String,
    pub prefix: Option<String>,
    pub base_unit: Option<String>,
    pub meter_type: MeterType,
    pub low_cardinality_keys: Vec<KeyNameEntry>,
    pub high_cardinality_keys: Vec<KeyNameEntry>,
    pub additional_keys: Vec<KeyNameEntry>,
    pub events: Vec<EventEntry>,
    pub overrides_default_metric_from: Option<OverrideRef>,
    /// Declared through an observation, which also registers a
    /// `<name>.active` long task timer
    pub observation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanEntry {
    pub name: Option<String>,
    pub contextual_name: Option<String>,
    pub name_from_convention_class: Option<String>,
    pub convention_class: Option<String>,
    pub enclosing_class: String,
    pub enum_name: String,
    pub description: String,
    pub prefix: Option<String>,
    pub tag_keys: Vec<KeyNameEntry>,
    pub additional_keys: Vec<KeyNameEntry>,
    pub events: Vec<EventEntry>,
    pub overrides_default_span_from: Option<OverrideRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConventionKind {
    Global,
    Local,
}

/// A class implementing an observation convention interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationConventionEntry {
    pub class_name: String,
    pub kind: ConventionKind,
    pub context_class_name: String,
}

/// Fields shared by metric and span entries
pub trait DocumentedEntry {
    fn name(&self) -> Option<&str>;
    fn convention_class(&self) -> Option<&str>;
    fn enclosing_class(&self) -> &str;
    fn enum_name(&self) -> &str;
    fn description(&self) -> &str;
    fn prefix(&self) -> Option<&str>;
    fn overrides(&self) -> Option<&OverrideRef>;

    /// Every key the entry documents, first occurrence of each name
    fn key_names(&self) -> Vec<&KeyNameEntry>;

    /// Whether the entry declares any keys of its own
    fn has_own_keys(&self) -> bool;

    /// `(class, constant)` identity
    fn reference(&self) -> OverrideRef {
        OverrideRef::new(self.enclosing_class(), self.enum_name())
    }
}

impl DocumentedEntry for MetricEntry {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn convention_class(&self) -> Option<&str> {
        self.convention_class.as_deref()
    }
    fn enclosing_class(&self) -> &str {
        &self.enclosing_class
    }
    fn enum_name(&self) -> &str {
        &self.enum_name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
    fn overrides(&self) -> Option<&OverrideRef> {
        self.overrides_default_metric_from.as_ref()
    }
    fn key_names(&self) -> Vec<&KeyNameEntry> {
        unique_keys(
            self.low_cardinality_keys
                .iter()
                .chain(&self.high_cardinality_keys)
                .chain(&self.additional_keys),
        )
    }
    fn has_own_keys(&self) -> bool {
        !self.low_cardinality_keys.is_empty() || !self.high_cardinality_keys.is_empty()
    }
}

impl DocumentedEntry for SpanEntry {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn convention_class(&self) -> Option<&str> {
        self.convention_class.as_deref()
    }
    fn enclosing_class(&self) -> &str {
        &self.enclosing_class
    }
    fn enum_name(&self) -> &str {
        &self.enum_name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
    fn overrides(&self) -> Option<&OverrideRef> {
        self.overrides_default_span_from.as_ref()
    }
    fn key_names(&self) -> Vec<&KeyNameEntry> {
        unique_keys(self.tag_keys.iter().chain(&self.additional_keys))
    }
    fn has_own_keys(&self) -> bool {
        !self.tag_keys.is_empty()
    }
}

fn unique_keys<'k>(keys: impl Iterator<Item = &'k KeyNameEntry>) -> Vec<&'k KeyNameEntry> {
    let mut seen = HashSet::new();
    keys.filter(|key| seen.insert(key.name.as_str())).collect()
}

/// Sort keys by name and drop repeated names, keeping the first occurrence
pub fn normalize_keys(keys: &mut Vec<KeyNameEntry>) {
    let mut unique: BTreeMap<String, KeyNameEntry> = BTreeMap::new();
    for key in keys.drain(..) {
        unique.entry(key.name.clone()).or_insert(key);
    }
    keys.extend(unique.into_values());
}

/// Sort events by name and drop repeated names
pub fn normalize_events(events: &mut Vec<EventEntry>) {
    let mut unique: BTreeMap<String, EventEntry> = BTreeMap::new();
    for event in events.drain(..) {
        unique.entry(event.name.clone()).or_insert(event);
    }
    events.extend(unique.into_values());
}

/// Everything a run extracted, in output order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentationSet {
    pub metrics: Vec<MetricEntry>,
    pub spans: Vec<SpanEntry>,
    pub conventions: Vec<ObservationConventionEntry>,
}

impl DocumentationSet {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.spans.is_empty() && self.conventions.is_empty()
    }

    pub fn metric(&self, enum_name: &str) -> Option<&MetricEntry> {
        self.metrics.iter().find(|m| m.enum_name == enum_name)
    }

    pub fn span(&self, enum_name: &str) -> Option<&SpanEntry> {
        self.spans.iter().find(|s| s.enum_name == enum_name)
    }
}
