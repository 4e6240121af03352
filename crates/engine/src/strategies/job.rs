use serde_json::Value;

use fieldkeep_core::fields::{nested_string_map, set_nested_string_map};

use crate::RetainError;

/// The job controller assigns immutable selector labels (controller-uid,
/// job-name) at admission; reapplying pre-admission labels would be
/// rejected by the API server, so the live label maps always win once set.
pub(crate) fn retain_job_selector(mut desired: Value, observed: &Value) -> Result<Value, RetainError> {
    if let Some(match_labels) = nested_string_map(observed, &["spec", "selector", "matchLabels"])? {
        set_nested_string_map(&mut desired, &["spec", "selector", "matchLabels"], &match_labels)?;
    }
    if let Some(template_labels) =
        nested_string_map(observed, &["spec", "template", "metadata", "labels"])?
    {
        set_nested_string_map(
            &mut desired,
            &["spec", "template", "metadata", "labels"],
            &template_labels,
        )?;
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn admitted_selector_labels_win() {
        let desired = json!({ "spec": { "selector": { "matchLabels": {} } } });
        let observed = json!({ "spec": {
            "selector": { "matchLabels": { "controller-uid": "abc" } },
            "template": { "metadata": { "labels": { "controller-uid": "abc", "job-name": "j" } } }
        } });
        let retained = retain_job_selector(desired, &observed).unwrap();
        assert_eq!(
            retained["spec"]["selector"]["matchLabels"],
            json!({ "controller-uid": "abc" })
        );
        assert_eq!(
            retained["spec"]["template"]["metadata"]["labels"],
            json!({ "controller-uid": "abc", "job-name": "j" })
        );
    }

    #[test]
    fn unadmitted_job_keeps_declared_labels() {
        let desired = json!({ "spec": {
            "template": { "metadata": { "labels": { "app": "batch" } } }
        } });
        let observed = json!({ "spec": {} });
        let retained = retain_job_selector(desired.clone(), &observed).unwrap();
        assert_eq!(retained, desired);
    }

    #[test]
    fn the_two_label_maps_are_independent() {
        // observed has only template labels; selector must stay declared
        let desired = json!({ "spec": { "selector": { "matchLabels": { "app": "batch" } } } });
        let observed =
            json!({ "spec": { "template": { "metadata": { "labels": { "job-name": "j" } } } } });
        let retained = retain_job_selector(desired, &observed).unwrap();
        assert_eq!(retained["spec"]["selector"]["matchLabels"], json!({ "app": "batch" }));
        assert_eq!(
            retained["spec"]["template"]["metadata"]["labels"],
            json!({ "job-name": "j" })
        );
    }
}
