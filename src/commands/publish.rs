use std::path::Path;

use clap::Args;
use serde::Serialize;

use satops::api::SatelliteClient;
use satops::config::Config;
use satops::{organization, promote, publish};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct PublishArgs {
    /// Path to the satops configuration file
    #[arg(long, default_value = "satops.json")]
    pub config: String,
    /// Publish content views but skip composite view promotion
    #[arg(long)]
    pub skip_promote: bool,
    /// Promote composite views without publishing first
    #[arg(long, conflicts_with = "skip_promote")]
    pub promote_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutput {
    pub command: String,
    pub organization: String,
    pub organization_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<publish::PublishSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promote: Option<promote::PromoteSummary>,
}

pub fn run(args: PublishArgs) -> CmdResult<PublishOutput> {
    let config = Config::load(Path::new(&args.config))?;
    let client = SatelliteClient::new(&config)?;
    let org_id = organization::resolve_id(&client, &config.org_name)?;

    let publish_summary = if args.promote_only {
        None
    } else {
        Some(publish::run(&client, &config, org_id)?)
    };

    let promote_summary = if args.skip_promote {
        None
    } else {
        Some(promote::run(&client, &config, org_id)?)
    };

    Ok((
        PublishOutput {
            command: "publish".to_string(),
            organization: config.org_name.clone(),
            organization_id: org_id,
            publish: publish_summary,
            promote: promote_summary,
        },
        0,
    ))
}
