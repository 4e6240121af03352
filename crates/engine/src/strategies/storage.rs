use serde_json::Value;

use fieldkeep_core::fields::{nested_string, nested_value, set_nested_value};

use crate::RetainError;

/// `spec.volumeName` is allocated by the storage binder on first bind and
/// immutable afterwards; once observed non-empty it must win.
pub(crate) fn retain_persistent_volume_claim(
    mut desired: Value,
    observed: &Value,
) -> Result<Value, RetainError> {
    if let Some(volume_name) = nested_string(observed, &["spec", "volumeName"])? {
        if !volume_name.is_empty() {
            set_nested_value(&mut desired, &["spec", "volumeName"], Value::String(volume_name))?;
        }
    }
    Ok(desired)
}

/// `spec.claimRef` is written by the volume-claim binder outside the
/// reconcile loop; copied verbatim whenever present, even explicitly empty.
pub(crate) fn retain_persistent_volume(
    mut desired: Value,
    observed: &Value,
) -> Result<Value, RetainError> {
    if let Some(claim_ref) = nested_value(observed, &["spec", "claimRef"])? {
        let claim_ref = claim_ref.clone();
        set_nested_value(&mut desired, &["spec", "claimRef"], claim_ref)?;
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bound_volume_name_is_retained() {
        let desired = json!({ "spec": { "storageClassName": "fast" } });
        let observed = json!({ "spec": { "volumeName": "pv-42" } });
        let retained = retain_persistent_volume_claim(desired, &observed).unwrap();
        assert_eq!(retained["spec"]["volumeName"], json!("pv-42"));
        assert_eq!(retained["spec"]["storageClassName"], json!("fast"));
    }

    #[test]
    fn unbound_claim_is_untouched() {
        let desired = json!({ "spec": { "volumeName": "pinned" } });
        for observed in [json!({ "spec": {} }), json!({ "spec": { "volumeName": "" } })] {
            let retained = retain_persistent_volume_claim(desired.clone(), &observed).unwrap();
            assert_eq!(retained, desired);
        }
    }

    #[test]
    fn claim_ref_is_copied_verbatim() {
        let desired = json!({ "spec": { "capacity": { "storage": "1Gi" } } });
        let observed = json!({ "spec": { "claimRef": { "name": "pvc-1", "namespace": "ns" } } });
        let retained = retain_persistent_volume(desired, &observed).unwrap();
        assert_eq!(retained["spec"]["claimRef"], json!({ "name": "pvc-1", "namespace": "ns" }));
        assert_eq!(retained["spec"]["capacity"], json!({ "storage": "1Gi" }));
    }

    #[test]
    fn explicitly_empty_claim_ref_still_wins() {
        let desired = json!({ "spec": { "claimRef": { "name": "stale" } } });
        let observed = json!({ "spec": { "claimRef": {} } });
        let retained = retain_persistent_volume(desired, &observed).unwrap();
        assert_eq!(retained["spec"]["claimRef"], json!({}));
    }

    #[test]
    fn absent_claim_ref_is_a_noop() {
        let desired = json!({ "spec": { "claimRef": { "name": "kept" } } });
        let observed = json!({ "spec": {} });
        let retained = retain_persistent_volume(desired.clone(), &observed).unwrap();
        assert_eq!(retained, desired);
    }
}
