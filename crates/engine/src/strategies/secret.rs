use serde_json::Value;

use fieldkeep_core::fields::{nested_string, nested_string_map, set_nested_string_map};

use crate::RetainError;

pub const SERVICE_ACCOUNT_TOKEN_TYPE: &str = "kubernetes.io/service-account-token";

/// Token payloads are minted asynchronously by the live cluster's token
/// controller; for service-account-token secrets the observed `data` wins
/// wholesale. Every other secret type passes through untouched.
pub(crate) fn retain_service_account_token(
    mut desired: Value,
    observed: &Value,
) -> Result<Value, RetainError> {
    let is_token = nested_string(&desired, &["type"])?
        .is_some_and(|t| t == SERVICE_ACCOUNT_TOKEN_TYPE);
    if !is_token {
        return Ok(desired);
    }
    if let Some(data) = nested_string_map(observed, &["data"])? {
        set_nested_string_map(&mut desired, &["data"], &data)?;
    }
    Ok(desired)
}
