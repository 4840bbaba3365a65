//! PubChem PUG-View fetch client

use async_trait::async_trait;
use pubchem_common::CompoundId;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::models::RawCompound;

/// Default PUG-View compound endpoint
pub const DEFAULT_API_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug_view/data/compound";

/// Response for one compound. `Failed` is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Found(RawCompound),
    Failed(CompoundId),
}

#[async_trait]
pub trait CompoundFetcher: Send + Sync {
    /// Fetch one compound record.
    ///
    /// Ordinary remote failures are reported as [`FetchResponse::Failed`].
    /// `Err` is reserved for failures that should abort the whole job.
    async fn fetch_by_id(&self, cid: CompoundId) -> Result<FetchResponse>;
}

/// reqwest-backed client for the public PubChem API
pub struct PubChemClient {
    client: Client,
    base_url: String,
}

impl PubChemClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pubchem-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    fn compound_url(&self, cid: CompoundId) -> String {
        format!("{}/{}/JSON", self.base_url, cid)
    }
}

#[async_trait]
impl CompoundFetcher for PubChemClient {
    async fn fetch_by_id(&self, cid: CompoundId) -> Result<FetchResponse> {
        let url = self.compound_url(cid);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(cid = cid.get(), error = %e, "PubChem request failed");
                return Ok(FetchResponse::Failed(cid));
            },
        };

        let status = response.status();
        if !status.is_success() {
            warn!(cid = cid.get(), status = status.as_u16(), "PubChem returned an error status");
            return Ok(FetchResponse::Failed(cid));
        }

        match response.json::<RawCompound>().await {
            Ok(raw) => {
                debug!(cid = cid.get(), "Fetched compound");
                Ok(FetchResponse::Found(raw))
            },
            Err(e) => {
                warn!(cid = cid.get(), error = %e, "Failed to decode PubChem response");
                Ok(FetchResponse::Failed(cid))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn cid(value: i64) -> CompoundId {
        CompoundId::new(value).unwrap()
    }

    fn client_for(server: &MockServer) -> PubChemClient {
        PubChemClient::new(format!("{}/compound/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_compound_url() {
        let client = PubChemClient::new(DEFAULT_API_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.compound_url(cid(2244)),
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug_view/data/compound/2244/JSON"
        );
    }

    #[tokio::test]
    async fn test_fetch_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/2244/JSON"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Record": {"RecordType": "CID", "RecordNumber": 2244, "RecordTitle": "Aspirin"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).fetch_by_id(cid(2244)).await.unwrap();

        match response {
            FetchResponse::Found(raw) => {
                assert_eq!(raw.record.record_number, Some(2244));
                assert_eq!(raw.record.record_title.as_deref(), Some("Aspirin"));
            },
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_failure_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/9/JSON"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let response = client_for(&server).fetch_by_id(cid(9)).await.unwrap();
        assert_eq!(response, FetchResponse::Failed(cid(9)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_failure_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/10/JSON"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&server)
            .await;

        let response = client_for(&server).fetch_by_id(cid(10)).await.unwrap();
        assert_eq!(response, FetchResponse::Failed(cid(10)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_failure_value() {
        let client = PubChemClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let response = client.fetch_by_id(cid(1)).await.unwrap();
        assert_eq!(response, FetchResponse::Failed(cid(1)));
    }
}
