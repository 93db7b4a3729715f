//! Outbound report email.
//!
//! One HTML message through the configured SMTP relay, sent once. There is
//! no retry; a failed send surfaces as an error.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::Config;
use crate::error::{Error, Result};

pub const REPORT_SUBJECT: &str = "Satellite Host Report";

pub fn send_report(config: &Config, html: &str) -> Result<()> {
    let message = Message::builder()
        .from(parse_mailbox("mailFrom", &config.mail_from)?)
        .to(parse_mailbox("mailTo", &config.mail_to)?)
        .subject(REPORT_SUBJECT)
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())
        .map_err(|e| Error::mail_send_failed(e.to_string()))?;

    // Plain unauthenticated relay on port 25.
    let transport = SmtpTransport::builder_dangerous(config.smtp_host.as_str()).build();
    transport
        .send(&message)
        .map_err(|e| Error::mail_send_failed(e.to_string()))?;

    log_status!("mail", "Report sent to {}", config.mail_to);
    Ok(())
}

fn parse_mailbox(key: &str, value: &str) -> Result<Mailbox> {
    value
        .parse()
        .map_err(|e: lettre::address::AddressError| {
            Error::config_invalid_value(key, Some(value.to_string()), e.to_string())
        })
}
