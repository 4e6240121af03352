//! Restart-annotation helpers.
//!
//! `kubectl rollout restart` stamps the pod template with an RFC 3339
//! annotation; the newest stamp must survive reconciliation or a restart
//! requested on the live side would be silently undone.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::RetainError;

pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// The raw annotation value and its parsed instant, if present. A value
/// that is present but unparseable is an error, never ignored: a corrupt
/// timestamp could mask a legitimate newer restart request.
pub fn restarted_at(
    annotations: Option<&BTreeMap<String, String>>,
) -> Result<Option<(&str, DateTime<FixedOffset>)>, RetainError> {
    let raw = match annotations.and_then(|a| a.get(RESTARTED_AT_ANNOTATION)) {
        Some(v) => v,
        None => return Ok(None),
    };
    let ts = DateTime::parse_from_rfc3339(raw)
        .map_err(|source| RetainError::RestartedAt { value: raw.clone(), source })?;
    Ok(Some((raw.as_str(), ts)))
}

/// Copy the observed restart stamp into `desired` when it is newer than (or
/// missing from) the desired one. Equal or older observed stamps leave the
/// desired metadata untouched; without an observed stamp nothing is created,
/// not even an empty metadata/annotations map.
pub(crate) fn carry_newest_restarted_at(
    desired: &mut Option<ObjectMeta>,
    observed: Option<&ObjectMeta>,
) -> Result<(), RetainError> {
    let observed_annotations = observed.and_then(|m| m.annotations.as_ref());
    let (raw, observed_ts) = match restarted_at(observed_annotations)? {
        Some(v) => v,
        None => return Ok(()),
    };
    let desired_annotations = desired.as_ref().and_then(|m| m.annotations.as_ref());
    let observed_is_newer = match restarted_at(desired_annotations)? {
        Some((_, desired_ts)) => desired_ts < observed_ts,
        None => true,
    };
    if observed_is_newer {
        desired
            .get_or_insert_with(Default::default)
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(RESTARTED_AT_ANNOTATION.to_string(), raw.to_string());
    }
    Ok(())
}
