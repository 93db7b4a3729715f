use std::path::Path;

use clap::Args;
use serde::Serialize;

use satops::api::SatelliteClient;
use satops::config::Config;
use satops::hosts;
use satops::{mailer, report};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ReportArgs {
    /// Path to the satops configuration file
    #[arg(long, default_value = "satops.json")]
    pub config: String,
    /// Print a plain-text table to stdout instead of sending the email
    #[arg(long)]
    pub no_mail: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub command: String,
    pub organization: String,
    pub hosts: usize,
    pub mailed_to: String,
}

/// Whether the command writes the raw text table instead of the JSON
/// envelope.
pub fn is_text(args: &ReportArgs) -> bool {
    args.no_mail
}

pub fn run(args: ReportArgs) -> CmdResult<ReportOutput> {
    let config = Config::load(Path::new(&args.config))?;
    config.validate_mail()?;

    let client = SatelliteClient::new(&config)?;
    let rows = hosts::fetch_all(&client, &config.org_name)?;

    let html = report::render_html(&rows, chrono::Local::now().date_naive());
    mailer::send_report(&config, &html)?;

    Ok((
        ReportOutput {
            command: "report".to_string(),
            organization: config.org_name.clone(),
            hosts: rows.len(),
            mailed_to: config.mail_to.clone(),
        },
        0,
    ))
}

pub fn run_text(args: ReportArgs) -> satops::Result<(String, i32)> {
    let config = Config::load(Path::new(&args.config))?;
    let client = SatelliteClient::new(&config)?;
    let rows = hosts::fetch_all(&client, &config.org_name)?;
    Ok((report::render_text(&rows), 0))
}
