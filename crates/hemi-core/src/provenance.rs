//! Provenance and schema descriptors attached to persisted sweep artefacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every sweep or optimisation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the surrounding report.
    #[serde(default)]
    pub schema: SchemaVersion,
    /// Hash of the plan or optimisation settings that produced the data.
    pub input_hash: String,
    /// Name of the field oracle implementation used for every query.
    pub oracle: String,
    /// Seed of the stochastic components, when any were involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// ISO-8601 timestamp recording when the artefact was generated.
    pub created_at: String,
    /// Version map for all tools involved in the run.
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Builds a provenance record with the epoch placeholder timestamp.
    ///
    /// Reports stay byte-identical across reruns unless the caller stamps a
    /// real timestamp afterwards.
    pub fn new(input_hash: impl Into<String>, oracle: impl Into<String>) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            "hemi-core".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Self {
            schema: SchemaVersion::default(),
            input_hash: input_hash.into(),
            oracle: oracle.into(),
            seed: None,
            created_at: "1970-01-01T00:00:00Z".to_string(),
            tool_versions,
        }
    }

    /// Records the seed used by stochastic components.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
