//! Fieldkeep core types: resource-kind identifiers and generic field access
//! over unstructured (JSON) Kubernetes objects.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

pub mod fields;

pub use fields::FieldError;

/// A Kubernetes resource kind: the group/version/kind triple.
///
/// Compared by value; used as the retention registry key. Scope
/// (namespaced vs cluster) is irrelevant to retention and not carried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl ResourceKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self { group: group.to_string(), version: version.to_string(), kind: kind.to_string() }
    }

    /// Core API group (`v1`).
    pub fn core_v1(kind: &str) -> Self {
        Self::new("", "v1", kind)
    }

    pub fn apps_v1(kind: &str) -> Self {
        Self::new("apps", "v1", kind)
    }

    pub fn batch_v1(kind: &str) -> Self {
        Self::new("batch", "v1", kind)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.kind)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.kind)
        }
    }
}
