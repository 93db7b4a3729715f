//! Content view models and listings.

use serde::Deserialize;

use crate::api::SatelliteClient;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct ContentView {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub composite: bool,
    /// Historical versions in publish order; the latest is the last element.
    #[serde(default)]
    pub versions: Vec<VersionRef>,
    /// Lifecycle environments this view is currently published into.
    #[serde(default)]
    pub environments: Vec<EnvironmentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionRef {
    pub id: u64,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentRef {
    pub id: u64,
    pub name: String,
}

/// Paged listing wrapper shared by the Katello collection endpoints.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Non-composite, non-default content views of the organization.
pub fn list_noncomposite(client: &SatelliteClient, org_id: u64) -> Result<Vec<ContentView>> {
    let url = client.katello_url(&format!(
        "organizations/{}/content_views?noncomposite=true&nondefault=true",
        org_id
    ));
    let listing: Listing<ContentView> = client.get_as(&url)?;
    Ok(listing.results)
}

/// Composite content views of the organization.
pub fn list_composite(client: &SatelliteClient, org_id: u64) -> Result<Vec<ContentView>> {
    let url = client.katello_url(&format!("organizations/{}/content_views?composite=true", org_id));
    let listing: Listing<ContentView> = client.get_as(&url)?;
    Ok(listing.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_tolerates_missing_optional_fields() {
        let view: ContentView = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "rhel-8-base"
        }))
        .unwrap();

        assert!(!view.composite);
        assert!(view.versions.is_empty());
        assert!(view.environments.is_empty());
    }

    #[test]
    fn versions_preserve_server_order() {
        let view: ContentView = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "ccv-prod",
            "composite": true,
            "versions": [{"id": 11, "version": "1.0"}, {"id": 23, "version": "2.0"}]
        }))
        .unwrap();

        assert_eq!(view.versions.last().map(|v| v.id), Some(23));
    }
}
