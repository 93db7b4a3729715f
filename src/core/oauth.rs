//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Satellite's API uses two-legged OAuth: a consumer key and secret, no
//! token. Each request carries an `Authorization: OAuth ...` header whose
//! signature covers the HTTP method, the URL, and the query parameters.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

// RFC 5849 section 3.6: only unreserved characters stay literal.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

/// Percent-encodes a single URL or parameter component.
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Produces a signed `Authorization` header value for the request.
pub fn sign(method: &str, url: &str, credentials: &Credentials) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    authorization_header(method, url, credentials, &nonce, timestamp)
}

fn authorization_header(
    method: &str,
    url: &str,
    credentials: &Credentials,
    nonce: &str,
    timestamp: u64,
) -> String {
    let timestamp = timestamp.to_string();
    let oauth_params = [
        ("oauth_consumer_key", credentials.key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_version", "1.0"),
    ];

    let (base_url, query) = split_query(url);
    let mut params: Vec<(String, String)> = parse_query(query);
    params.extend(
        oauth_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let base = signature_base_string(method, base_url, &params);
    // Two-legged: the token secret half of the key is empty.
    let signing_key = format!("{}&", encode_component(&credentials.secret));
    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(base.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let mut fields: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    fields.push(("oauth_signature".to_string(), signature));
    fields.sort();

    let rendered: Vec<String> = fields
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, encode_component(v)))
        .collect();
    format!("OAuth {}", rendered.join(", "))
}

/// Builds the RFC 5849 signature base string from the method, the URL
/// without its query, and all request parameters.
fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode_component(k), encode_component(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode_component(base_url),
        encode_component(&param_string)
    )
}

fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    }
}

fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_leaves_unreserved_characters_alone() {
        assert_eq!(encode_component("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("Actions::Katello"), "Actions%3A%3AKatello");
        assert_eq!(encode_component("a=b&c"), "a%3Db%26c");
    }

    #[test]
    fn base_string_sorts_and_double_encodes_parameters() {
        let params = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
            ("oauth_nonce".to_string(), "n".to_string()),
        ];

        let base = signature_base_string("get", "https://sat.example.com/api/v2/hosts", &params);

        assert_eq!(
            base,
            "GET&https%3A%2F%2Fsat.example.com%2Fapi%2Fv2%2Fhosts&a%3D1%26b%3D2%26oauth_nonce%3Dn"
        );
    }

    #[test]
    fn query_parameters_participate_in_the_signature() {
        let creds = Credentials {
            key: "key".to_string(),
            secret: "secret".to_string(),
        };

        let plain = authorization_header("GET", "https://s.example.com/api", &creds, "nonce", 1);
        let with_query = authorization_header(
            "GET",
            "https://s.example.com/api?search=state%20%3D%20running",
            &creds,
            "nonce",
            1,
        );

        assert_ne!(plain, with_query);
    }

    #[test]
    fn header_is_deterministic_for_fixed_nonce_and_timestamp() {
        let creds = Credentials {
            key: "key".to_string(),
            secret: "secret".to_string(),
        };

        let a = authorization_header("POST", "https://s.example.com/api", &creds, "nonce", 99);
        let b = authorization_header("POST", "https://s.example.com/api", &creds, "nonce", 99);

        assert_eq!(a, b);
        assert!(a.starts_with("OAuth "));
        assert!(a.contains("oauth_consumer_key=\"key\""));
        assert!(a.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(a.contains("oauth_signature=\""));
        assert!(a.contains("oauth_version=\"1.0\""));
    }
}
