//! Satellite API client.
//!
//! Thin blocking wrapper over the Foreman/Katello REST endpoints. Every
//! request is signed with the configured OAuth credentials, and every
//! response is status-checked before its body is parsed as JSON.

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::oauth::{self, Credentials};

pub struct SatelliteClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl SatelliteClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|e| Error::api_request_failed(config.base_url(), e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            credentials: Credentials {
                key: config.oauth_key.clone(),
                secret: config.oauth_secret.clone(),
            },
        })
    }

    /// URL under the Foreman API root (`/api/v2/`).
    pub fn foreman_url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, path)
    }

    /// URL under the Katello API root (`/katello/api/`).
    pub fn katello_url(&self, path: &str) -> String {
        format!("{}/katello/api/{}", self.base_url, path)
    }

    /// Task listing URL with a pre-encoded search query.
    pub fn tasks_url(&self, search: &str) -> String {
        format!("{}/foreman_tasks/api/tasks?search={}", self.base_url, search)
    }

    /// Makes a GET request.
    pub fn get(&self, url: &str) -> Result<Value> {
        let auth = oauth::sign("GET", url, &self.credentials);
        let response = self
            .client
            .get(url)
            .header("Authorization", auth)
            .send()
            .map_err(|e| Error::api_request_failed(url, e.to_string()))?;

        parse_json_response(url, response)
    }

    /// Makes a GET request and deserializes the response body.
    pub fn get_as<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let value = self.get(url)?;
        serde_json::from_value(value).map_err(|e| Error::api_invalid_response(url, e.to_string()))
    }

    /// Makes a POST request with a JSON body.
    pub fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let auth = oauth::sign("POST", url, &self.credentials);
        let response = self
            .client
            .post(url)
            .header("Authorization", auth)
            .json(body)
            .send()
            .map_err(|e| Error::api_request_failed(url, e.to_string()))?;

        parse_json_response(url, response)
    }
}

fn parse_json_response(url: &str, response: Response) -> Result<Value> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| Error::api_request_failed(url, e.to_string()))?;

    if !status.is_success() {
        return Err(Error::api_error_response(url, status.as_u16(), body));
    }

    serde_json::from_str(&body)
        .map_err(|e| Error::api_invalid_response(url, format!("Invalid JSON response: {}", e)))
}
