//! Schema version identity and its canonical string form

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of one schema version: namespace, schema name, and version.
///
/// The canonical form is `reference_id`, the dot-join of the three parts.
/// Equality, ordering and hashing are based solely on the reference id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaKey {
    /// Owning namespace
    pub namespace: String,

    /// Schema name within the namespace
    pub schema_name: String,

    /// Opaque version string
    pub version: String,
}

impl SchemaKey {
    /// Create a key from its three parts.
    pub fn new(
        namespace: impl Into<String>,
        schema_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            schema_name: schema_name.into(),
            version: version.into(),
        }
    }

    /// The canonical string identity of this schema version.
    #[must_use]
    pub fn reference_id(&self) -> String {
        [
            self.namespace.as_str(),
            self.schema_name.as_str(),
            self.version.as_str(),
        ]
        .join(".")
    }
}

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        self.reference_id() == other.reference_id()
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference_id().hash(state);
    }
}

impl PartialOrd for SchemaKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchemaKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reference_id().cmp(&other.reference_id())
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference_id())
    }
}
