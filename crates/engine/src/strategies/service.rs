use serde_json::Value;

use fieldkeep_core::fields::{nested_i64, nested_string, nested_value, set_nested_value};

use crate::RetainError;

/// Cluster-allocated service networking: clusterIP(s), healthCheckNodePort,
/// and per-port nodePorts are handed out by the API server on admission and
/// must survive reconciliation.
pub(crate) fn retain_service(mut desired: Value, observed: &Value) -> Result<Value, RetainError> {
    if let Some(port) = nested_i64(observed, &["spec", "healthCheckNodePort"])? {
        if port > 0 {
            set_nested_value(&mut desired, &["spec", "healthCheckNodePort"], Value::from(port))?;
        }
    }
    if let Some(cluster_ip) = nested_string(observed, &["spec", "clusterIP"])? {
        if !cluster_ip.is_empty() {
            set_nested_value(&mut desired, &["spec", "clusterIP"], Value::String(cluster_ip))?;
        }
    }
    if let Some(Value::Array(ips)) = nested_value(observed, &["spec", "clusterIPs"])? {
        if !ips.is_empty() {
            set_nested_value(&mut desired, &["spec", "clusterIPs"], Value::Array(ips.clone()))?;
        }
    }
    carry_node_ports(&mut desired, observed)?;
    Ok(desired)
}

/// A desired port entry adopts the observed nodePort of the entry matching
/// its (name, protocol, port); ports only declared on one side are left as
/// they are.
fn carry_node_ports(desired: &mut Value, observed: &Value) -> Result<(), RetainError> {
    let observed_ports = match nested_value(observed, &["spec", "ports"])? {
        Some(Value::Array(ports)) => ports.clone(),
        _ => return Ok(()),
    };
    let desired_ports = match desired.get_mut("spec").and_then(|s| s.get_mut("ports")) {
        Some(Value::Array(ports)) => ports,
        _ => return Ok(()),
    };
    for desired_port in desired_ports.iter_mut() {
        let matched = observed_ports.iter().find(|p| {
            p.get("name") == desired_port.get("name")
                && p.get("protocol") == desired_port.get("protocol")
                && p.get("port") == desired_port.get("port")
        });
        if let Some(node_port) = matched.and_then(|p| p.get("nodePort")) {
            if let Some(entry) = desired_port.as_object_mut() {
                entry.insert("nodePort".to_string(), node_port.clone());
            }
        }
    }
    Ok(())
}

/// The token controller appends auto-generated token secrets in the live
/// cluster; they are only carried over when the desired account declares
/// none of its own.
pub(crate) fn retain_service_account(
    mut desired: Value,
    observed: &Value,
) -> Result<Value, RetainError> {
    if let Some(Value::Array(declared)) = nested_value(&desired, &["secrets"])? {
        if !declared.is_empty() {
            return Ok(desired);
        }
    }
    if let Some(secrets) = nested_value(observed, &["secrets"])? {
        let secrets = secrets.clone();
        set_nested_value(&mut desired, &["secrets"], secrets)?;
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allocated_networking_fields_are_retained() {
        let desired = json!({ "spec": { "type": "LoadBalancer", "ports": [] } });
        let observed = json!({ "spec": {
            "clusterIP": "10.0.0.7",
            "clusterIPs": ["10.0.0.7"],
            "healthCheckNodePort": 32020
        } });
        let retained = retain_service(desired, &observed).unwrap();
        assert_eq!(retained["spec"]["clusterIP"], json!("10.0.0.7"));
        assert_eq!(retained["spec"]["clusterIPs"], json!(["10.0.0.7"]));
        assert_eq!(retained["spec"]["healthCheckNodePort"], json!(32020));
        assert_eq!(retained["spec"]["type"], json!("LoadBalancer"));
    }

    #[test]
    fn empty_observed_cluster_ip_is_not_copied() {
        let desired = json!({ "spec": {} });
        let observed = json!({ "spec": { "clusterIP": "", "clusterIPs": [] } });
        let retained = retain_service(desired.clone(), &observed).unwrap();
        assert_eq!(retained, desired);
    }

    #[test]
    fn node_ports_match_on_name_protocol_and_port() {
        let desired = json!({ "spec": { "ports": [
            { "name": "http", "protocol": "TCP", "port": 80 },
            { "name": "dns", "protocol": "UDP", "port": 53, "nodePort": 30099 }
        ] } });
        let observed = json!({ "spec": { "ports": [
            { "name": "http", "protocol": "TCP", "port": 80, "nodePort": 31234 },
            { "name": "dns", "protocol": "TCP", "port": 53, "nodePort": 30053 }
        ] } });
        let retained = retain_service(desired, &observed).unwrap();
        let ports = retained["spec"]["ports"].as_array().unwrap();
        assert_eq!(ports[0]["nodePort"], json!(31234));
        // protocol differs, so the declared nodePort stands
        assert_eq!(ports[1]["nodePort"], json!(30099));
    }

    #[test]
    fn generated_sa_secrets_fill_an_empty_list() {
        let desired = json!({ "metadata": { "name": "runner" } });
        let observed = json!({ "secrets": [ { "name": "runner-token-x7k2p" } ] });
        let retained = retain_service_account(desired, &observed).unwrap();
        assert_eq!(retained["secrets"], json!([ { "name": "runner-token-x7k2p" } ]));
    }

    #[test]
    fn declared_sa_secrets_take_precedence() {
        let desired = json!({ "secrets": [ { "name": "pinned" } ] });
        let observed = json!({ "secrets": [ { "name": "runner-token-x7k2p" } ] });
        let retained = retain_service_account(desired.clone(), &observed).unwrap();
        assert_eq!(retained, desired);
    }
}
