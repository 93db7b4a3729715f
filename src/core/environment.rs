//! Lifecycle environments and the promotion chain.
//!
//! Environments form a chain rooted at Library: each one points at the
//! environment content must pass through first (`prior`). Promotion order is
//! derived from that chain instead of trusting numeric ids to mirror it.

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::SatelliteClient;
use crate::content_view::Listing;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleEnvironment {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub prior: Option<PriorRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriorRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Lifecycle environments of the organization.
pub fn list(client: &SatelliteClient, org_id: u64) -> Result<Vec<LifecycleEnvironment>> {
    let url = client.katello_url(&format!("organizations/{}/environments", org_id));
    let listing: Listing<LifecycleEnvironment> = client.get_as(&url)?;
    Ok(listing.results)
}

/// Distance of each environment from the chain root (Library = 0), keyed by
/// environment id. A malformed `prior` loop terminates at the chain length.
pub fn chain_depths(environments: &[LifecycleEnvironment]) -> HashMap<u64, u32> {
    let prior: HashMap<u64, Option<u64>> = environments
        .iter()
        .map(|env| (env.id, env.prior.as_ref().map(|p| p.id)))
        .collect();

    let mut depths = HashMap::new();
    for env in environments {
        let mut depth = 0u32;
        let mut cursor = prior.get(&env.id).copied().flatten();
        while let Some(id) = cursor {
            depth += 1;
            if depth as usize > environments.len() {
                break;
            }
            cursor = prior.get(&id).copied().flatten();
        }
        depths.insert(env.id, depth);
    }
    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(id: u64, name: &str, prior: Option<u64>) -> LifecycleEnvironment {
        LifecycleEnvironment {
            id,
            name: name.to_string(),
            prior: prior.map(|id| PriorRef { id, name: None }),
        }
    }

    #[test]
    fn depths_follow_prior_links_regardless_of_ids() {
        // Library has the highest id here on purpose.
        let envs = vec![
            env(9, "Library", None),
            env(2, "QA", Some(9)),
            env(5, "Production", Some(2)),
        ];

        let depths = chain_depths(&envs);

        assert_eq!(depths[&9], 0);
        assert_eq!(depths[&2], 1);
        assert_eq!(depths[&5], 2);
    }

    #[test]
    fn prior_loop_does_not_hang() {
        let envs = vec![env(1, "A", Some(2)), env(2, "B", Some(1))];

        let depths = chain_depths(&envs);

        assert!(depths[&1] >= 1);
        assert!(depths[&2] >= 1);
    }
}
