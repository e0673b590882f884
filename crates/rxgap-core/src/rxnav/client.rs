//! RxNav REST client
//!
//! Async HTTP client for the public RxNav and RxClass endpoints used by the
//! harvest: classification trees, class members, related concepts, and
//! concept history status. One GET per call, no retries; callers decide how
//! to classify a failure.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::debug;

use crate::config::RxNavConfig;
use crate::error::{Error, Result};

use super::types::{
    AllRelatedResponse, ClassMembersResponse, ClassTreeResponse, HistoryStatusResponse,
    MemberQuery,
};

/// Public RxNav API base URL
pub const DEFAULT_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Default per-request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// RxNav API client
///
/// Cheap to clone; all methods take `&self` and issue a single request.
#[derive(Debug, Clone)]
pub struct RxNavClient {
    /// HTTP client for making requests
    http_client: HttpClient,
    /// Base URL for the API, without a trailing slash
    base_url: String,
}

/// Builder for creating an RxNavClient
pub struct RxNavClientBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for RxNavClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RxNavClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
        }
    }

    /// Set the base URL (defaults to the public RxNav service)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the RxNavClient
    pub fn build(self) -> Result<RxNavClient> {
        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Network)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(RxNavClient {
            http_client,
            base_url,
        })
    }
}

impl RxNavClient {
    /// Create a client from configuration
    pub fn new(config: &RxNavConfig) -> Result<Self> {
        RxNavClientBuilder::new()
            .base_url(config.base_url.clone())
            .timeout_secs(config.timeout_secs)
            .build()
    }

    /// Create a new builder for RxNavClient
    pub fn builder() -> RxNavClientBuilder {
        RxNavClientBuilder::new()
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the classification tree rooted at `class_id`
    pub async fn class_tree(
        &self,
        class_id: &str,
        class_type: &str,
    ) -> Result<ClassTreeResponse> {
        let url = format!("{}/rxclass/classTree.json", self.base_url);

        debug!(class_id, class_type, "Fetching classification tree");

        let response = self
            .http_client
            .get(&url)
            .query(&[("classId", class_id), ("classType", class_type)])
            .send()
            .await
            .map_err(Error::Network)?;

        Self::ensure_success("classTree", &response)?;
        response.json().await.map_err(Error::Network)
    }

    /// Fetch the drug members of a classification class
    pub async fn class_members(&self, query: &MemberQuery) -> Result<ClassMembersResponse> {
        let url = format!("{}/rxclass/classMembers.json", self.base_url);

        debug!(
            class_id = %query.class_id,
            rela_source = %query.rela_source,
            rela = query.rela.as_deref().unwrap_or(""),
            "Fetching class members"
        );

        let response = self
            .http_client
            .get(&url)
            .query(&query.query_params())
            .send()
            .await
            .map_err(Error::Network)?;

        Self::ensure_success("classMembers", &response)?;
        response.json().await.map_err(Error::Network)
    }

    /// Fetch every concept related to an RxCUI
    pub async fn all_related(&self, rxcui: &str) -> Result<AllRelatedResponse> {
        let url = format!("{}/rxcui/{}/allrelated.json", self.base_url, rxcui);

        debug!(rxcui, "Fetching related concepts");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::Network)?;

        Self::ensure_success("allrelated", &response)?;
        response.json().await.map_err(Error::Network)
    }

    /// Fetch the history status of an RxCUI
    pub async fn history_status(&self, rxcui: &str) -> Result<HistoryStatusResponse> {
        let url = format!("{}/rxcui/{}/historystatus.json", self.base_url, rxcui);

        debug!(rxcui, "Fetching history status");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::Network)?;

        Self::ensure_success("historystatus", &response)?;
        response.json().await.map_err(Error::Network)
    }

    /// Reject non-2xx answers before attempting to parse a body
    fn ensure_success(endpoint: &'static str, response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
