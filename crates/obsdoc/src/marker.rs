//! The documentation marker interfaces and their accessor tables

use obsdoc_parser_api::{strip_generics, TypeDecl};
use serde::Serialize;
use std::fmt;

/// Which key set a key-name accessor contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySlot {
    LowCardinality,
    HighCardinality,
    Additional,
}

/// What an accessor method means for the entry being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// `getName()` / `getValue()` / `asString()`: the literal name
    Name,
    /// `getDefaultConvention()`: the convention class that names the entry
    DefaultConvention,
    ContextualName,
    KeyNames(KeySlot),
    Events,
    Prefix,
    BaseUnit,
    MeterType,
    /// `overridesDefaultMetricFrom()` / `overridesDefaultSpanFrom()`
    Overrides,
    /// `isRequired()` of a key name
    Required,
}

/// A recognized marker interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarkerSpec {
    KeyName,
    EventValue,
    MeterDocumentation,
    SpanDocumentation,
    ObservationDocumentation,
}

impl MarkerSpec {
    /// Documentation markers first: a type implementing both kinds is a
    /// documentation enum.
    pub const ALL: [MarkerSpec; 5] = [
        MarkerSpec::ObservationDocumentation,
        MarkerSpec::MeterDocumentation,
        MarkerSpec::SpanDocumentation,
        MarkerSpec::KeyName,
        MarkerSpec::EventValue,
    ];

    /// Interface names, simple and fully qualified, that identify the marker
    pub fn interface_names(self) -> &'static [&'static str] {
        match self {
            MarkerSpec::KeyName => &["KeyName", "io.micrometer.common.docs.KeyName"],
            MarkerSpec::EventValue => &[
                "EventValue",
                "io.micrometer.tracing.docs.EventValue",
                "Event",
                "Observation.Event",
                "io.micrometer.observation.Observation.Event",
                "io.micrometer.observation.Observation$Event",
            ],
            MarkerSpec::MeterDocumentation => &[
                "MeterDocumentation",
                "io.micrometer.core.instrument.docs.MeterDocumentation",
            ],
            MarkerSpec::SpanDocumentation => &[
                "SpanDocumentation",
                "io.micrometer.tracing.docs.SpanDocumentation",
            ],
            MarkerSpec::ObservationDocumentation => &[
                "ObservationDocumentation",
                "io.micrometer.observation.docs.ObservationDocumentation",
            ],
        }
    }

    /// Markers whose enums are documented entries rather than components
    pub fn is_documentation(self) -> bool {
        matches!(
            self,
            MarkerSpec::MeterDocumentation
                | MarkerSpec::SpanDocumentation
                | MarkerSpec::ObservationDocumentation
        )
    }

    /// Does the raw interface string (generics allowed) name this marker?
    pub fn matches(self, interface: &str) -> bool {
        let name = strip_generics(interface);
        self.interface_names().contains(&name)
    }

    /// Is this marker among the type's declared interfaces?
    pub fn implemented_by(self, decl: &TypeDecl) -> bool {
        decl.interfaces.iter().any(|i| self.matches(i))
    }

    /// The first marker the type implements, documentation markers first
    pub fn of_type(decl: &TypeDecl) -> Option<MarkerSpec> {
        Self::ALL.into_iter().find(|spec| spec.implemented_by(decl))
    }

    /// Look up what an accessor method means for this marker
    pub fn accessor(self, method: &str) -> Option<Accessor> {
        use Accessor::*;
        use KeySlot::*;

        let accessor = match (self, method) {
            (MarkerSpec::KeyName, "asString") => Name,
            (MarkerSpec::KeyName, "isRequired") => Required,

            (MarkerSpec::EventValue, "getName" | "getValue") => Name,
            (MarkerSpec::EventValue, "getContextualName") => ContextualName,

            (MarkerSpec::MeterDocumentation, "getName") => Name,
            (MarkerSpec::MeterDocumentation, "getDefaultConvention") => DefaultConvention,
            (MarkerSpec::MeterDocumentation, "getKeyNames") => KeyNames(LowCardinality),
            (MarkerSpec::MeterDocumentation, "getAdditionalKeyNames") => KeyNames(Additional),
            (MarkerSpec::MeterDocumentation, "getType") => MeterType,
            (MarkerSpec::MeterDocumentation, "getBaseUnit") => BaseUnit,
            (MarkerSpec::MeterDocumentation, "getPrefix") => Prefix,
            (MarkerSpec::MeterDocumentation, "getEvents") => Events,
            (MarkerSpec::MeterDocumentation, "overridesDefaultMetricFrom") => Overrides,

            (MarkerSpec::SpanDocumentation, "getName") => Name,
            (MarkerSpec::SpanDocumentation, "getDefaultConvention") => DefaultConvention,
            (MarkerSpec::SpanDocumentation, "getContextualName") => ContextualName,
            (MarkerSpec::SpanDocumentation, "getKeyNames") => KeyNames(LowCardinality),
            (MarkerSpec::SpanDocumentation, "getAdditionalKeyNames") => KeyNames(Additional),
            (MarkerSpec::SpanDocumentation, "getEvents") => Events,
            (MarkerSpec::SpanDocumentation, "getPrefix") => Prefix,
            (MarkerSpec::SpanDocumentation, "overridesDefaultSpanFrom") => Overrides,

            (MarkerSpec::ObservationDocumentation, "getName") => Name,
            (MarkerSpec::ObservationDocumentation, "getDefaultConvention") => DefaultConvention,
            (MarkerSpec::ObservationDocumentation, "getContextualName") => ContextualName,
            (MarkerSpec::ObservationDocumentation, "getLowCardinalityKeyNames") => {
                KeyNames(LowCardinality)
            }
            (MarkerSpec::ObservationDocumentation, "getHighCardinalityKeyNames") => {
                KeyNames(HighCardinality)
            }
            (MarkerSpec::ObservationDocumentation, "getEvents") => Events,
            (MarkerSpec::ObservationDocumentation, "getPrefix") => Prefix,

            _ => return None,
        };
        Some(accessor)
    }

    /// Accessor names a referenced constant is read through when an entry
    /// inherits keys from it
    pub fn key_accessors(self) -> &'static [(&'static str, KeySlot)] {
        match self {
            MarkerSpec::MeterDocumentation | MarkerSpec::SpanDocumentation => {
                &[("getKeyNames", KeySlot::LowCardinality)]
            }
            MarkerSpec::ObservationDocumentation => &[
                ("getLowCardinalityKeyNames", KeySlot::LowCardinality),
                ("getHighCardinalityKeyNames", KeySlot::HighCardinality),
            ],
            MarkerSpec::KeyName | MarkerSpec::EventValue => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkerSpec::KeyName => "KeyName",
            MarkerSpec::EventValue => "EventValue",
            MarkerSpec::MeterDocumentation => "MeterDocumentation",
            MarkerSpec::SpanDocumentation => "SpanDocumentation",
            MarkerSpec::ObservationDocumentation => "ObservationDocumentation",
        }
    }
}

impl fmt::Display for MarkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
