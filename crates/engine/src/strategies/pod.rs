use k8s_openapi::api::core::v1::{Container, Pod};
use serde_json::Value;

use crate::convert::{from_unstructured, to_unstructured, Side};
use crate::RetainError;

/// Scheduler- and admission-owned pod fields: node assignment, the service
/// account, volumes, and per-container volume mounts (webhooks commonly
/// inject all of these after admission). Copied unconditionally.
pub(crate) fn retain_pod(desired: Value, observed: &Value) -> Result<Value, RetainError> {
    let mut desired_pod: Pod = from_unstructured(&desired, Side::Desired, "Pod")?;
    let observed_pod: Pod = from_unstructured(observed, Side::Observed, "Pod")?;

    let observed_spec = observed_pod.spec.unwrap_or_default();
    let desired_spec = desired_pod.spec.get_or_insert_with(Default::default);

    desired_spec.node_name = observed_spec.node_name;
    desired_spec.service_account_name = observed_spec.service_account_name;
    desired_spec.volumes = observed_spec.volumes;

    carry_volume_mounts(&mut desired_spec.containers, &observed_spec.containers);
    if let (Some(desired_inits), Some(observed_inits)) =
        (desired_spec.init_containers.as_mut(), observed_spec.init_containers.as_ref())
    {
        carry_volume_mounts(desired_inits, observed_inits);
    }

    to_unstructured(&desired_pod, "Pod")
}

/// Match by container name, first match wins; desired containers with no
/// observed counterpart keep their declared mounts.
fn carry_volume_mounts(desired: &mut [Container], observed: &[Container]) {
    for observed_container in observed {
        if let Some(desired_container) =
            desired.iter_mut().find(|c| c.name == observed_container.name)
        {
            desired_container.volume_mounts = observed_container.volume_mounts.clone();
        }
    }
}
