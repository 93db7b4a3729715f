//! Organization lookup.

use serde_json::Value;

use crate::api::SatelliteClient;
use crate::error::{Error, Result};
use crate::oauth;

/// Resolves an organization name to its id.
///
/// Foreman answers a lookup miss with an `error` object rather than a 404,
/// so both shapes are treated as fatal here.
pub fn resolve_id(client: &SatelliteClient, name: &str) -> Result<u64> {
    let url = client.foreman_url(&format!("organizations/{}", oauth::encode_component(name)));
    let value = client.get(&url)?;

    if let Some(error) = value.get("error") {
        return Err(Error::organization_not_found(name, error.clone()));
    }

    value
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::api_invalid_response(&url, "Organization response missing id"))
}
