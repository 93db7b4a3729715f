//! Host report rendering.
//!
//! Two renderings of the same rows: the HTML table that goes out by mail and
//! a fixed-width text table for running the report at a console. "Today" is
//! injected so staleness is decidable in tests.

use chrono::NaiveDate;

use crate::hosts::HostPatchStatus;

const TABLE_STYLE: &str = r#"<head>
<style>
table {
    font-family: Arial, Helvetica, Open Sans, sans-serif;
    width: 100%;
    border-collapse: collapse;
}
th {
    background-color: #1E4B5E;
    color: #dddddd;
}
td, th {
    text-align: left;
    padding: 8px;
    border: 1px solid #dddddd;
}
.nth-table tr:nth-child(even) {
    color: #5cb85c;
}
</style>
</head>"#;

const TABLE_HEADER: &str = r#"<tr>
    <th>Hosts</th>
    <th>Last Checkin</th>
    <th>Security</th>
    <th>Bugfixes</th>
    <th>Upgradable</th>
</tr>"#;

const STALE_ROW_STYLE: &str = r#" style="background-color: #ba2d37""#;

/// Whether a check-in value should be flagged as stale.
///
/// Check-ins look like "2026-08-20 04:11:02 UTC"; the date part decides.
/// Values that do not parse as a date (the "error" sentinel included) are
/// flagged so they stand out in the report.
fn is_stale(last_checkin: &str, today: NaiveDate) -> bool {
    last_checkin
        .split(' ')
        .next()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(|date| date < today)
        .unwrap_or(true)
}

pub fn render_html(rows: &[HostPatchStatus], today: NaiveDate) -> String {
    let mut body = String::new();
    for row in rows {
        let row_style = if is_stale(&row.last_checkin, today) {
            STALE_ROW_STYLE
        } else {
            ""
        };
        body.push_str(&format!(
            "<tr>
    <td{style}>{}</td>
    <td{style}>{}</td>
    <td{style}>{}</td>
    <td{style}>{}</td>
    <td{style}>{}</td>
</tr>\n",
            row.hostname,
            row.last_checkin,
            row.security_patches,
            row.bugfixes,
            row.total_patches,
            style = row_style,
        ));
    }

    format!(
        "<html>\n{}\n<h1>Satellite Host Report</h1>\n<table class=\"nth-table\">\n{}\n{}</table>\n</html>",
        TABLE_STYLE, TABLE_HEADER, body
    )
}

pub fn render_text(rows: &[HostPatchStatus]) -> String {
    let mut out = format!(
        "{:<40} {:<30} {:<10} {:<10} {:<10}\n",
        "Host", "Last Checkin", "Bugfixes", "Security", "Upgradable"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<40} {:<30} {:<10} {:<10} {:<10}\n",
            row.hostname,
            row.last_checkin,
            row.bugfixes,
            row.security_patches,
            row.total_patches
        ));
    }
    out
}
