//! Host inventory fetching and per-host erratum extraction.

use serde::{Deserialize, Serialize};

use crate::api::SatelliteClient;
use crate::error::Result;
use crate::oauth;

/// Sentinel recorded when a host is missing subscription or content data.
/// The literal string is what report readers see in every affected column.
pub const MISSING: &str = "error";

#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub subscription_facet_attributes: Option<SubscriptionFacet>,
    #[serde(default)]
    pub content_facet_attributes: Option<ContentFacet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionFacet {
    #[serde(default)]
    pub last_checkin: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentFacet {
    #[serde(default)]
    pub errata_counts: Option<ErrataCounts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrataCounts {
    #[serde(default)]
    pub bugfix: i64,
    #[serde(default)]
    pub security: i64,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct HostPage {
    pub total: u64,
    pub per_page: u64,
    #[serde(default)]
    pub results: Vec<Host>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPatchStatus {
    pub hostname: String,
    pub last_checkin: String,
    pub bugfixes: String,
    pub security_patches: String,
    pub total_patches: String,
}

/// Pages needed to cover `total` hosts.
///
/// Ceiling division: a trailing partial page still has to be fetched.
pub fn page_count(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Patch status for one host. A host missing either facet is recorded with
/// sentinel values rather than failing the report.
pub fn extract_status(host: &Host) -> HostPatchStatus {
    let checkin = host
        .subscription_facet_attributes
        .as_ref()
        .and_then(|facet| facet.last_checkin.clone());
    let errata = host
        .content_facet_attributes
        .as_ref()
        .and_then(|facet| facet.errata_counts.clone());

    match (checkin, errata) {
        (Some(last_checkin), Some(errata)) => HostPatchStatus {
            hostname: host.name.clone(),
            last_checkin,
            bugfixes: errata.bugfix.to_string(),
            security_patches: errata.security.to_string(),
            total_patches: errata.total.to_string(),
        },
        _ => HostPatchStatus {
            hostname: host.name.clone(),
            last_checkin: MISSING.to_string(),
            bugfixes: MISSING.to_string(),
            security_patches: MISSING.to_string(),
            total_patches: MISSING.to_string(),
        },
    }
}

/// Fetches every host of the organization page by page.
///
/// The first unfiltered request supplies the total count and the server's
/// page size; subsequent requests filter by organization.
pub fn fetch_all(client: &SatelliteClient, org_name: &str) -> Result<Vec<HostPatchStatus>> {
    let first: HostPage = client.get_as(&client.foreman_url("hosts"))?;
    let pages = page_count(first.total, first.per_page);
    let search = oauth::encode_component(&format!("organization=\"{}\"", org_name));

    let mut statuses = Vec::new();
    for page in 1..=pages {
        let url = client.foreman_url(&format!(
            "hosts?page={}&search={}&per_page={}",
            page, search, first.per_page
        ));
        let listing: HostPage = client.get_as(&url)?;
        statuses.extend(listing.results.iter().map(extract_status));
    }

    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_trailing_page_is_fetched() {
        assert_eq!(page_count(125, 50), 3);
        assert_eq!(page_count(100, 50), 2);
        assert_eq!(page_count(1, 50), 1);
        assert_eq!(page_count(0, 50), 0);
    }

    #[test]
    fn zero_page_size_means_no_pages() {
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn missing_facets_yield_sentinels_without_dropping_the_host() {
        let host: Host = serde_json::from_value(serde_json::json!({
            "name": "web01.example.com"
        }))
        .unwrap();

        let status = extract_status(&host);

        assert_eq!(status.hostname, "web01.example.com");
        assert_eq!(status.last_checkin, "error");
        assert_eq!(status.bugfixes, "error");
        assert_eq!(status.security_patches, "error");
        assert_eq!(status.total_patches, "error");
    }

    #[test]
    fn missing_errata_counts_alone_also_yields_sentinels() {
        let host: Host = serde_json::from_value(serde_json::json!({
            "name": "db01.example.com",
            "subscription_facet_attributes": {"last_checkin": "2026-08-20 04:11:02 UTC"},
            "content_facet_attributes": {}
        }))
        .unwrap();

        let status = extract_status(&host);

        assert_eq!(status.last_checkin, "error");
        assert_eq!(status.bugfixes, "error");
    }

    #[test]
    fn complete_host_maps_counts_to_strings() {
        let host: Host = serde_json::from_value(serde_json::json!({
            "name": "app01.example.com",
            "subscription_facet_attributes": {"last_checkin": "2026-08-20 04:11:02 UTC"},
            "content_facet_attributes": {
                "errata_counts": {"bugfix": 4, "security": 2, "total": 9}
            }
        }))
        .unwrap();

        let status = extract_status(&host);

        assert_eq!(status.last_checkin, "2026-08-20 04:11:02 UTC");
        assert_eq!(status.bugfixes, "4");
        assert_eq!(status.security_patches, "2");
        assert_eq!(status.total_patches, "9");
    }
}
