//! Content view publishing workflow.
//!
//! Publishes a new version of every non-composite, non-default content view
//! that is not excluded, one at a time. Each publish waits for the task
//! queue to drain before the next starts: serialization keeps the queue
//! small and guarantees version ordering.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::json;

use crate::api::SatelliteClient;
use crate::config::Config;
use crate::content_view::{self, ContentView};
use crate::error::Result;
use crate::tasks::{self, TaskCategory, WaitOptions};

pub const PUBLISH_DESCRIPTION: &str = "Automatic publish over API";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRecord {
    pub id: u64,
    pub name: String,
    pub polls: u32,
    pub waited_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSummary {
    pub published: Vec<PublishRecord>,
    pub skipped: Vec<String>,
}

/// Splits the listing into views to publish (in listing order) and skipped
/// names.
pub fn plan<'a>(
    views: &'a [ContentView],
    excluded: &BTreeSet<String>,
) -> (Vec<&'a ContentView>, Vec<String>) {
    let mut selected = Vec::new();
    let mut skipped = Vec::new();
    for view in views {
        if excluded.contains(&view.name) {
            skipped.push(view.name.clone());
        } else {
            selected.push(view);
        }
    }
    (selected, skipped)
}

pub fn run(client: &SatelliteClient, config: &Config, org_id: u64) -> Result<PublishSummary> {
    let views = content_view::list_noncomposite(client, org_id)?;
    let (selected, skipped) = plan(&views, &config.excluded_cvs);
    let options = WaitOptions::for_publish(config);

    let mut published = Vec::new();
    for view in selected {
        log_status!(
            "publish",
            "{} Publish {}",
            chrono::Local::now().format("%Y-%m-%d %X"),
            view.name
        );

        let url = client.katello_url(&format!("content_views/{}/publish", view.id));
        client.post(&url, &json!({ "description": PUBLISH_DESCRIPTION }))?;

        let outcome = tasks::wait(client, TaskCategory::Publish, &options)?;
        published.push(PublishRecord {
            id: view.id,
            name: view.name.clone(),
            polls: outcome.polls,
            waited_secs: outcome.waited.as_secs(),
        });
    }

    Ok(PublishSummary { published, skipped })
}
