use k8s_openapi::api::apps::v1::Deployment;
use serde_json::Value;

use crate::convert::{from_unstructured, to_unstructured, Side};
use crate::restart::carry_newest_restarted_at;
use crate::RetainError;

/// Opt-out marker: a desired workload labelled with this key/value cedes
/// ownership of `spec.replicas` to the cluster (e.g. an external autoscaler).
pub const RETAIN_REPLICAS_LABEL: &str = "fieldkeep.io/retain-replicas";
pub const RETAIN_REPLICAS_VALUE: &str = "true";

pub(crate) fn retain_workload(desired: Value, observed: &Value) -> Result<Value, RetainError> {
    let mut desired_deploy: Deployment = from_unstructured(&desired, Side::Desired, "Deployment")?;
    let observed_deploy: Deployment = from_unstructured(observed, Side::Observed, "Deployment")?;

    // Restart stamps live on the pod template, not the top-level metadata.
    if let (Some(desired_spec), Some(observed_spec)) =
        (desired_deploy.spec.as_mut(), observed_deploy.spec.as_ref())
    {
        carry_newest_restarted_at(
            &mut desired_spec.template.metadata,
            observed_spec.template.metadata.as_ref(),
        )?;
    }

    let opted_out = desired_deploy
        .metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(RETAIN_REPLICAS_LABEL))
        .is_some_and(|v| v == RETAIN_REPLICAS_VALUE);
    if opted_out {
        if let (Some(desired_spec), Some(observed_spec)) =
            (desired_deploy.spec.as_mut(), observed_deploy.spec.as_ref())
        {
            desired_spec.replicas = observed_spec.replicas;
        }
    }

    to_unstructured(&desired_deploy, "Deployment")
}
