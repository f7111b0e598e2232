//! Twitter status client with OAuth 1.0a user-context signing.
//!
//! Posts through `POST /1.1/statuses/update.json?status=...`. Each request
//! is signed with HMAC-SHA1 over the method, URL and every parameter.

use crate::circuit_breaker::{ApiCircuitBreaker, ApiCircuitBreakerConfig};
use crate::providers::MessagePoster;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Client;
use sha1::Sha1;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const TWITTER_API_BASE_URL: &str = "https://api.twitter.com";

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct TwitterClient {
    http: Client,
    base_url: String,
    credentials: OAuthCredentials,
    circuit_breaker: Arc<ApiCircuitBreaker>,
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("base_url", &self.base_url)
            .field("circuit_breaker_state", &self.circuit_breaker.state())
            .finish()
    }
}

impl TwitterClient {
    pub fn new(base_url: String, credentials: OAuthCredentials) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            credentials,
            circuit_breaker: Arc::new(ApiCircuitBreaker::new(
                "twitter",
                ApiCircuitBreakerConfig {
                    failure_threshold: 3,
                    recovery_timeout: Duration::from_secs(60),
                    success_threshold: 1,
                },
            )),
        }
    }

    pub async fn update_status(&self, status: &str) -> Result<()> {
        let endpoint = format!(
            "{}/1.1/statuses/update.json",
            self.base_url.trim_end_matches('/')
        );
        let params = [("status", status)];
        let auth = authorization_header(
            "POST",
            &endpoint,
            &params,
            &self.credentials,
            &generate_nonce(),
            unix_timestamp()?,
        )?;
        let url = format!("{}?status={}", endpoint, encode(status));

        self.circuit_breaker
            .call(|| async {
                let resp = self
                    .http
                    .post(&url)
                    .header(reqwest::header::AUTHORIZATION, auth.as_str())
                    .send()
                    .await
                    .with_context(|| format!("Twitter API request failed: {endpoint}"))?;

                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                if !status.is_success() {
                    bail!("Twitter API non-2xx: {status} body={text}");
                }
                Ok::<(), anyhow::Error>(())
            })
            .await
    }
}

#[async_trait]
impl MessagePoster for TwitterClient {
    async fn post_message(&self, text: &str) -> Result<()> {
        self.update_status(text).await
    }

    fn poster_name(&self) -> &str {
        "twitter"
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn unix_timestamp() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow!("system clock before epoch: {e}"))?
        .as_secs())
}

/// Build the `Authorization: OAuth ...` header value for one request.
///
/// `params` are the request's query/form parameters; they take part in the
/// signature but not in the header.
pub fn authorization_header(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    credentials: &OAuthCredentials,
    nonce: &str,
    timestamp: u64,
) -> Result<String> {
    let timestamp = timestamp.to_string();
    let oauth_params = [
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let signature = sign(method, url, params, &oauth_params, credentials)?;

    let mut header_params: Vec<(&str, &str)> = oauth_params.to_vec();
    header_params.push(("oauth_signature", signature.as_str()));
    header_params.sort();

    let fields: Vec<String> = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect();
    Ok(format!("OAuth {}", fields.join(", ")))
}

fn sign(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    oauth_params: &[(&str, &str)],
    credentials: &OAuthCredentials,
) -> Result<String> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .chain(oauth_params.iter())
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&parameter_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| anyhow!("invalid OAuth signing key: {e}"))?;
    mac.update(base_string.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
