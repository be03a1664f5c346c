use std::time::Duration;

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};

use super::model::{RecordState, Rrset, RrsetPayload};
use super::{API_KEY_HEADER, ApiError};
use crate::config::RecordDefinition;

/// Overall timeout for management-API requests. The IP-echo phase carries its own, much shorter
/// per-request timeout; see [`crate::resolver`].
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a LiveDNS-style record management API.
///
/// The API base URL and key live on each [`RecordDefinition`], so one client serves every
/// configured record.
#[derive(Debug)]
pub struct LiveDnsClient {
    reqwest: reqwest::Client,
}

impl LiveDnsClient {
    pub fn new() -> reqwest::Result<Self> {
        let ua = format!("{}/{}", clap::crate_name!(), clap::crate_version!());
        let reqwest = reqwest::Client::builder()
            .default_headers(HeaderMap::from_iter([(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )]))
            .user_agent(ua)
            .timeout(API_TIMEOUT)
            .build()?;

        Ok(Self { reqwest })
    }

    /// URL of the record resource for `record`.
    fn record_url(record: &RecordDefinition) -> String {
        format!(
            "{}domains/{}/records/{}/{}",
            record.api_base_url, record.domain, record.record_name, record.record_type
        )
    }

    /// Fetches the provider's current state for `record`.
    ///
    /// Only a definitive 404 maps to [`RecordState::Absent`]. Every other non-success status is
    /// an error: a flaky provider answer must not look like a missing record, or the caller would
    /// happily re-create a record that still exists.
    pub async fn fetch_record(&self, record: &RecordDefinition) -> Result<RecordState, ApiError> {
        let url = Self::record_url(record);
        debug!("GET {url}");

        let response = self
            .reqwest
            .get(&url)
            .header(API_KEY_HEADER, &record.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(RecordState::Absent),
            status if status.is_success() => {
                let rrset = response.json::<Rrset>().await?;
                Ok(RecordState::Present(rrset))
            },
            status => Err(ApiError::Status(status)),
        }
    }

    /// Creates the record, pointing it at `ip`.
    pub async fn create_record(&self, record: &RecordDefinition, ip: &str) -> Result<(), ApiError> {
        self.write_record(Method::POST, record, ip).await
    }

    /// Rewrites the record's value list to just `ip`, keeping the configured TTL.
    pub async fn update_record(&self, record: &RecordDefinition, ip: &str) -> Result<(), ApiError> {
        self.write_record(Method::PUT, record, ip).await
    }

    /// The API acknowledges both kinds of write with 201 exactly; anything else is a failure.
    async fn write_record(
        &self,
        method: Method,
        record: &RecordDefinition,
        ip: &str,
    ) -> Result<(), ApiError> {
        let url = Self::record_url(record);
        let payload = RrsetPayload { rrset_ttl: record.ttl, rrset_values: [ip] };
        debug!("{method} {url}");

        let response = self
            .reqwest
            .request(method, &url)
            .header(API_KEY_HEADER, &record.api_key)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(ApiError::Status(status)),
        }
    }
}
