//! EC2 query API client.
//!
//! [`Ec2Client`] turns a [`FormRequest`] into a signed
//! `application/x-www-form-urlencoded` POST against the endpoint of the
//! requested region, retries throttling and server faults with exponential
//! backoff, and feeds the response body to a [`SaxHandler`].
//!
//! Operations are grouped per API area; see [`Ec2Client::ami`] and friends
//! in [`crate::features`].

use std::time::{Duration, Instant};

use bytes::Bytes;
use chrono::Utc;
use http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::auth::{format_timestamp, FormSigner};
use crate::config::{Config, Ec2Config, HttpConfig};
use crate::domain::zone_to_region;
use crate::errors::Ec2Error;
use crate::metrics;
use crate::options::{indexed_params, FormParams};
use crate::xml::{parse_sax, SaxHandler};

const PROVIDER: &str = "ec2";

/// Upper bound for one backoff delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// An unsigned query API request: `Action` plus its form parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    action: String,
    params: Vec<(String, String)>,
}

impl FormRequest {
    pub fn new(action: impl Into<String>) -> Self {
        let action = action.into();
        Self {
            params: vec![("Action".to_string(), action.clone())],
            action,
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// `prefix.1`, `prefix.2`, ... for each value.
    pub fn indexed<S: AsRef<str>>(mut self, prefix: &str, values: &[S]) -> Self {
        self.params.extend(indexed_params(prefix, values));
        self
    }

    pub fn with_options(mut self, options: &impl FormParams) -> Self {
        self.params.extend(options.form_params());
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Client for the EC2 query API.
#[derive(Debug, Clone)]
pub struct Ec2Client {
    http: reqwest::Client,
    signer: FormSigner,
    ec2: Ec2Config,
    retry: HttpConfig,
}

impl Ec2Client {
    /// Build a client from loaded configuration.
    pub fn new(config: &Config) -> Result<Self, Ec2Error> {
        let credentials = config.credentials.clone().with_env_fallback();
        if credentials.access_key.is_empty() || credentials.secret_key.is_empty() {
            return Err(Ec2Error::Config(
                "credentials.access_key and credentials.secret_key are required".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            signer: FormSigner::new(
                credentials.access_key,
                credentials.secret_key,
                config.ec2.api_version.clone(),
            ),
            ec2: config.ec2.clone(),
            retry: config.http.clone(),
        })
    }

    /// The region a call lands in when it names none.
    pub fn default_region(&self) -> &str {
        &self.ec2.default_region
    }

    pub(crate) fn region_or_default(&self, region: Option<&str>) -> String {
        region.unwrap_or(&self.ec2.default_region).to_string()
    }

    /// Region that hosts `zone`.
    pub(crate) fn region_of_zone(&self, zone: Option<&str>) -> Option<String> {
        zone.map(|zone| zone_to_region(zone).to_string())
    }

    /// Endpoint for `region`; the configured default endpoint when `None`.
    pub fn endpoint(&self, region: Option<&str>) -> Result<Url, Ec2Error> {
        let endpoint = self.ec2.endpoint_for_region(region);
        Url::parse(&endpoint)
            .map_err(|e| Ec2Error::Config(format!("invalid endpoint {endpoint}: {e}")))
    }

    /// Sign, send and parse `request` in `region`.
    ///
    /// Every attempt is signed with its own timestamp.
    pub async fn execute<H: SaxHandler>(
        &self,
        region: Option<&str>,
        request: FormRequest,
        handler: H,
    ) -> Result<H::Output, Ec2Error> {
        let url = self.endpoint(region)?;
        let body = self.send_with_retry(&url, &request).await?;
        Ok(parse_sax(&body, handler)?)
    }

    async fn send_with_retry(&self, url: &Url, request: &FormRequest) -> Result<Bytes, Ec2Error> {
        let start = Instant::now();
        let result = RetryIf::start(
            retry_strategy(&self.retry),
            || self.send_once(url, request),
            |e: &Ec2Error| {
                let retryable = e.is_retryable();
                if retryable {
                    warn!(action = request.action(), error = %e, "retrying EC2 request");
                    metrics::record_retry(PROVIDER, request.action());
                }
                retryable
            },
        )
        .await;
        let status = match &result {
            Ok((status, _)) => Some(status.as_u16()),
            Err(e) => e.status().map(|s| s.as_u16()),
        };
        metrics::record_request(PROVIDER, request.action(), status, start.elapsed());
        result.map(|(_, body)| body)
    }

    async fn send_once(
        &self,
        url: &Url,
        request: &FormRequest,
    ) -> Result<(StatusCode, Bytes), Ec2Error> {
        let timestamp = format_timestamp(Utc::now());
        let body = self.signer.sign("POST", url, request.params(), &timestamp)?;
        debug!(action = request.action(), %url, "sending EC2 request");

        let response = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(action = request.action(), status = status.as_u16(), len = bytes.len(), "EC2 response");

        if !status.is_success() {
            return Err(Ec2Error::from_response(status, &bytes));
        }
        Ok((status, bytes))
    }
}

/// Exponential backoff with jitter: `2 * base`, `4 * base`, ... capped at
/// ten seconds, for at most `max_retries` retries.
pub(crate) fn retry_strategy(config: &HttpConfig) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(config.retry_base_delay_ms.max(1))
        .max_delay(MAX_RETRY_DELAY)
        .map(jitter)
        .take(config.max_retries)
}

// ── Fallbacks ───────────────────────────────────────────────────────

/// Describe calls treat a missing resource as an empty result.
pub fn empty_on_not_found<T: Default>(result: Result<T, Ec2Error>) -> Result<T, Ec2Error> {
    match result {
        Err(e) if e.is_not_found() => {
            debug!(code = e.code(), "not found; returning empty result");
            Ok(T::default())
        }
        other => other,
    }
}

/// Single-resource lookups map a missing resource to `None`.
pub fn none_on_not_found<T>(result: Result<T, Ec2Error>) -> Result<Option<T>, Ec2Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Detaching a volume that is already available is not a failure.
pub fn ok_on_volume_available(result: Result<(), Ec2Error>) -> Result<(), Ec2Error> {
    match result {
        Err(e) if e.is_volume_available() => {
            warn!(error = %e, "volume already detached");
            Ok(())
        }
        other => other,
    }
}
