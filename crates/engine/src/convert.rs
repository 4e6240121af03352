//! Typed projection: unstructured JSON ↔ k8s-openapi structs.
//!
//! Decode failures name which side of the retention call was malformed;
//! a desired-side failure points at the control plane's template, an
//! observed-side failure at corrupt live state.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::RetainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Desired,
    Observed,
}

pub fn from_unstructured<T>(obj: &Value, side: Side, kind: &'static str) -> Result<T, RetainError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(obj.clone()).map_err(|source| match side {
        Side::Desired => RetainError::DecodeDesired { kind, source },
        Side::Observed => RetainError::DecodeObserved { kind, source },
    })
}

pub fn to_unstructured<T: Serialize>(obj: &T, kind: &'static str) -> Result<Value, RetainError> {
    serde_json::to_value(obj).map_err(|source| RetainError::Encode { kind, source })
}
