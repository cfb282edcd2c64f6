use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::expr::MethodBody;
use crate::unit::{SourceUnit, TypeDecl};

/// Metrics collected during parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserMetrics {
    /// Total files attempted to parse
    pub files_attempted: usize,

    /// Files successfully parsed
    pub files_succeeded: usize,

    /// Files that failed parsing
    pub files_failed: usize,

    /// Total time spent parsing
    #[serde(with = "duration_serde")]
    pub total_parse_time: Duration,

    /// Total type declarations extracted (nested included)
    pub total_types: usize,

    /// Enum constants across all extracted types
    pub total_constants: usize,

    /// Method bodies that are not a single supported `return`
    pub unsupported_bodies: usize,
}

// Helper module for serializing Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: u64 = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl ParserMetrics {
    /// Success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.files_attempted == 0 {
            0.0
        } else {
            self.files_succeeded as f64 / self.files_attempted as f64
        }
    }

    /// Average parse time per file
    pub fn avg_parse_time(&self) -> Duration {
        if self.files_succeeded == 0 {
            Duration::ZERO
        } else {
            self.total_parse_time / self.files_succeeded as u32
        }
    }

    /// Merge another metrics object into this one
    pub fn merge(&mut self, other: &ParserMetrics) {
        self.files_attempted += other.files_attempted;
        self.files_succeeded += other.files_succeeded;
        self.files_failed += other.files_failed;
        self.total_parse_time += other.total_parse_time;
        self.total_types += other.total_types;
        self.total_constants += other.total_constants;
        self.unsupported_bodies += other.unsupported_bodies;
    }

    /// Count the declarations of a successfully parsed unit
    pub fn record_unit(&mut self, unit: &SourceUnit) {
        self.total_types += unit.type_count();
        for decl in &unit.types {
            self.record_type(decl);
        }
    }

    fn record_type(&mut self, decl: &TypeDecl) {
        self.total_constants += decl.constants.len();
        self.unsupported_bodies += decl
            .methods
            .iter()
            .chain(decl.constants.iter().flat_map(|c| &c.methods))
            .filter(|m| matches!(m.body, MethodBody::Unsupported(_)))
            .count();
        for nested in &decl.nested {
            self.record_type(nested);
        }
    }
}
