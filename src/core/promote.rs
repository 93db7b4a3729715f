//! Composite content view promotion workflow.
//!
//! Every composite view is promoted into every lifecycle environment it is
//! already published into, excluded environments aside, always with the
//! view's latest version. Environments closer to Library must receive a
//! version before those further downstream, so the steps are ordered by
//! chain depth before any promotion is issued.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use serde_json::json;

use crate::api::SatelliteClient;
use crate::config::Config;
use crate::content_view::{self, ContentView};
use crate::environment;
use crate::error::Result;
use crate::tasks::{self, TaskCategory, WaitOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionStep {
    pub ccv_id: u64,
    pub ccv_name: String,
    /// Latest version of the composite view at planning time.
    pub version_id: u64,
    pub env_id: u64,
    pub env_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteSummary {
    pub promoted: Vec<PromotionStep>,
    pub skipped: Vec<PromotionStep>,
}

/// Flattens the composite listing into ordered promotion steps.
///
/// Each step carries the view's latest version (the last element of its
/// versions sequence); views that have never been published yield no steps.
/// Steps are sorted by environment chain depth, environment id breaking
/// ties. With no chain data every depth is equal and the id alone orders
/// the steps.
pub fn plan(views: &[ContentView], depths: &HashMap<u64, u32>) -> Vec<PromotionStep> {
    let mut steps = Vec::new();
    for view in views {
        let Some(latest) = view.versions.last() else {
            continue;
        };
        for env in &view.environments {
            steps.push(PromotionStep {
                ccv_id: view.id,
                ccv_name: view.name.clone(),
                version_id: latest.id,
                env_id: env.id,
                env_name: env.name.clone(),
            });
        }
    }

    steps.sort_by_key(|step| (depths.get(&step.env_id).copied().unwrap_or(u32::MAX), step.env_id));
    steps
}

pub fn run(client: &SatelliteClient, config: &Config, org_id: u64) -> Result<PromoteSummary> {
    let views = content_view::list_composite(client, org_id)?;

    let depths = match environment::list(client, org_id) {
        Ok(environments) => environment::chain_depths(&environments),
        Err(err) => {
            log_status!(
                "promote",
                "Environment listing failed ({}); ordering by environment id",
                err
            );
            HashMap::new()
        }
    };

    let steps = plan(&views, &depths);
    let options = WaitOptions::for_promote(config);

    let mut promoted = Vec::new();
    let mut skipped = Vec::new();
    for step in steps {
        if is_excluded(&step, &config.excluded_envs) {
            skipped.push(step);
            continue;
        }

        let url = client.katello_url(&format!(
            "content_view_versions/{}/promote",
            step.version_id
        ));
        // The server rejects promotions that skip a stage; force bypasses
        // that guard for versions already present upstream.
        client.post(
            &url,
            &json!({ "environment_id": step.env_id, "force": true }),
        )?;

        log_status!(
            "promote",
            "{} Promoted {} to the {} environment",
            chrono::Local::now().format("%Y-%m-%d %X"),
            step.ccv_name,
            step.env_name
        );

        tasks::wait(client, TaskCategory::Promote, &options)?;
        promoted.push(step);
    }

    Ok(PromoteSummary { promoted, skipped })
}

fn is_excluded(step: &PromotionStep, excluded: &BTreeSet<String>) -> bool {
    excluded.contains(&step.env_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_view::{EnvironmentRef, VersionRef};

    fn composite(id: u64, name: &str, versions: &[u64], envs: &[(u64, &str)]) -> ContentView {
        ContentView {
            id,
            name: name.to_string(),
            composite: true,
            versions: versions.iter().map(|&id| VersionRef { id, version: None }).collect(),
            environments: envs
                .iter()
                .map(|&(id, name)| EnvironmentRef {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn plan_orders_steps_by_environment_id_without_chain_data() {
        let views = vec![
            composite(1, "ccv-a", &[10], &[(7, "Production"), (2, "Library")]),
            composite(2, "ccv-b", &[20], &[(5, "QA")]),
        ];

        let steps = plan(&views, &HashMap::new());

        let env_ids: Vec<u64> = steps.iter().map(|s| s.env_id).collect();
        let mut sorted = env_ids.clone();
        sorted.sort();
        assert_eq!(env_ids, sorted);
    }

    #[test]
    fn plan_follows_chain_depth_over_numeric_ids() {
        // Library carries the highest id; depth ordering must win.
        let views = vec![composite(
            1,
            "ccv",
            &[10],
            &[(5, "Production"), (9, "Library"), (2, "QA")],
        )];
        let depths = HashMap::from([(9, 0), (2, 1), (5, 2)]);

        let steps = plan(&views, &depths);

        let names: Vec<&str> = steps.iter().map(|s| s.env_name.as_str()).collect();
        assert_eq!(names, vec!["Library", "QA", "Production"]);
    }

    #[test]
    fn plan_always_selects_the_latest_version() {
        let views = vec![composite(1, "ccv", &[11, 23, 42], &[(3, "QA")])];

        let steps = plan(&views, &HashMap::new());

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].version_id, 42);
    }

    #[test]
    fn plan_skips_views_without_versions() {
        let views = vec![composite(1, "ccv-new", &[], &[(3, "QA")])];

        assert!(plan(&views, &HashMap::new()).is_empty());
    }

    #[test]
    fn excluded_environments_are_filtered_by_name() {
        let step = PromotionStep {
            ccv_id: 1,
            ccv_name: "ccv".to_string(),
            version_id: 10,
            env_id: 2,
            env_name: "Library".to_string(),
        };
        let excluded = BTreeSet::from(["Library".to_string()]);

        assert!(is_excluded(&step, &excluded));
    }
}
