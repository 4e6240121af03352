//! Fieldkeep retention engine.
//!
//! Given a desired object (what the control plane wants applied) and the
//! observed live object, a per-kind strategy copies the cluster-owned
//! fields from observed into desired so a reconcile never clobbers them.
//! Kinds with no registered strategy pass through unchanged.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use metrics::counter;
use serde_json::Value;
use tracing::debug;

use fieldkeep_core::{FieldError, ResourceKind};

pub mod convert;
pub mod restart;
mod strategies;

pub use strategies::secret::SERVICE_ACCOUNT_TOKEN_TYPE;
pub use strategies::workload::{RETAIN_REPLICAS_LABEL, RETAIN_REPLICAS_VALUE};

/// Errors that abort a single retention call. No partial result is ever
/// produced alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum RetainError {
    #[error("failed to decode desired {kind} from unstructured object: {source}")]
    DecodeDesired {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode observed {kind} from unstructured object: {source}")]
    DecodeObserved {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {kind} back to unstructured object: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("failed to parse kubectl.kubernetes.io/restartedAt value {value:?}: {source}")]
    RestartedAt {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A retention strategy: desired in (by value, possibly mutated), observed
/// read-only, retained out. The return value is the authoritative result;
/// callers must not rely on in-place mutation.
pub type RetainFn = fn(desired: Value, observed: &Value) -> Result<Value, RetainError>;

/// Kind-keyed strategy table. Built once, never mutated afterwards, so
/// lookups are safe from any number of reconcile workers concurrently.
pub struct Retainers {
    map: HashMap<ResourceKind, RetainFn>,
}

impl Retainers {
    /// The built-in strategy set.
    pub fn builtin() -> Self {
        let mut map: HashMap<ResourceKind, RetainFn> = HashMap::new();
        map.insert(ResourceKind::apps_v1("Deployment"), strategies::workload::retain_workload);
        map.insert(ResourceKind::core_v1("Pod"), strategies::pod::retain_pod);
        map.insert(ResourceKind::core_v1("Service"), strategies::service::retain_service);
        map.insert(
            ResourceKind::core_v1("ServiceAccount"),
            strategies::service::retain_service_account,
        );
        map.insert(
            ResourceKind::core_v1("PersistentVolumeClaim"),
            strategies::storage::retain_persistent_volume_claim,
        );
        map.insert(
            ResourceKind::core_v1("PersistentVolume"),
            strategies::storage::retain_persistent_volume,
        );
        map.insert(ResourceKind::batch_v1("Job"), strategies::job::retain_job_selector);
        map.insert(
            ResourceKind::core_v1("Secret"),
            strategies::secret::retain_service_account_token,
        );
        Self { map }
    }

    pub fn lookup(&self, kind: &ResourceKind) -> Option<RetainFn> {
        self.map.get(kind).copied()
    }

    /// Retain observed fields on `desired` per the strategy registered for
    /// `kind`. An unregistered kind is not an error: the desired object is
    /// returned unchanged (identity retention).
    pub fn retain(
        &self,
        kind: &ResourceKind,
        desired: Value,
        observed: &Value,
    ) -> Result<Value, RetainError> {
        counter!("retain_attempts", 1u64);
        let Some(strategy) = self.lookup(kind) else {
            debug!(kind = %kind, "no retention strategy registered; passing desired through");
            counter!("retain_passthrough", 1u64);
            return Ok(desired);
        };
        match strategy(desired, observed) {
            Ok(retained) => {
                counter!("retain_ok", 1u64);
                Ok(retained)
            }
            Err(e) => {
                counter!("retain_err", 1u64);
                Err(e)
            }
        }
    }
}

impl Default for Retainers {
    fn default() -> Self {
        Self::builtin()
    }
}
