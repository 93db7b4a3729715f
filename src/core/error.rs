use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    OrganizationNotFound,

    ApiRequestFailed,
    ApiErrorResponse,
    ApiInvalidResponse,

    TaskWaitTimeout,

    MailSendFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::OrganizationNotFound => "organization.not_found",

            ErrorCode::ApiRequestFailed => "api.request_failed",
            ErrorCode::ApiErrorResponse => "api.error_response",
            ErrorCode::ApiInvalidResponse => "api.invalid_response",

            ErrorCode::TaskWaitTimeout => "task.wait_timeout",

            ErrorCode::MailSendFailed => "mail.send_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNotFoundDetails {
    pub name: String,
    pub error: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequestFailedDetails {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponseDetails {
    pub url: String,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInvalidResponseDetails {
    pub url: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWaitTimeoutDetails {
    pub category: String,
    pub max_wait_secs: u64,
    pub last_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSendFailedDetails {
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = serde_json::to_value(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn organization_not_found(name: impl Into<String>, error: Value) -> Self {
        let details = serde_json::to_value(OrganizationNotFoundDetails {
            name: name.into(),
            error,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::OrganizationNotFound,
            "Organization not found",
            details,
        )
        .with_hint("Check orgName in the configuration against the Satellite organization list")
    }

    pub fn api_request_failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        let details = serde_json::to_value(ApiRequestFailedDetails {
            url: url.into(),
            error: error.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::ApiRequestFailed, "API request failed", details)
            .with_retryable(true)
    }

    pub fn api_error_response(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let details = serde_json::to_value(ApiErrorResponseDetails {
            url: url.into(),
            status,
            body: body.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ApiErrorResponse,
            format!("API error: HTTP {}", status),
            details,
        )
    }

    pub fn api_invalid_response(url: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = serde_json::to_value(ApiInvalidResponseDetails {
            url: url.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ApiInvalidResponse,
            "Unexpected API response",
            details,
        )
    }

    pub fn task_wait_timeout(
        category: impl Into<String>,
        max_wait_secs: u64,
        last_count: u64,
    ) -> Self {
        let details = serde_json::to_value(TaskWaitTimeoutDetails {
            category: category.into(),
            max_wait_secs,
            last_count,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::TaskWaitTimeout,
            "Timed out waiting for server-side tasks",
            details,
        )
        .with_retryable(true)
        .with_hint("Raise pollMaxWait or check the Satellite task queue for stuck tasks")
    }

    pub fn mail_send_failed(error: impl Into<String>) -> Self {
        let details = serde_json::to_value(MailSendFailedDetails {
            error: error.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::MailSendFailed, "Failed to send report email", details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalJsonErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dotted_strings() {
        assert_eq!(ErrorCode::OrganizationNotFound.as_str(), "organization.not_found");
        assert_eq!(ErrorCode::TaskWaitTimeout.as_str(), "task.wait_timeout");
        assert_eq!(ErrorCode::MailSendFailed.as_str(), "mail.send_failed");
    }

    #[test]
    fn task_wait_timeout_carries_details_and_retryable() {
        let err = Error::task_wait_timeout("promote", 3600, 2);

        assert_eq!(err.code, ErrorCode::TaskWaitTimeout);
        assert_eq!(err.retryable, Some(true));
        assert_eq!(err.details["category"], "promote");
        assert_eq!(err.details["maxWaitSecs"], 3600);
        assert_eq!(err.details["lastCount"], 2);
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn api_error_response_includes_status_in_message() {
        let err = Error::api_error_response("https://sat/api", 502, "bad gateway");

        assert_eq!(err.code, ErrorCode::ApiErrorResponse);
        assert!(err.message.contains("502"));
        assert_eq!(err.details["body"], "bad gateway");
    }
}
