use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::error::Result;
use crate::SearchEngine;
use reqwest::blocking::Client;
use strata_protocol::EngineRequest;
use strata_protocol::EngineResponse;
use tracing::debug;
use tracing::warn;

/// Search index reached over HTTP with Solr `select` semantics.
#[derive(Clone, Debug)]
pub struct HttpSearchEngine {
    http: Client,
    select_url: String,
    timeout_ms: u64,
}

impl HttpSearchEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| EngineError::Connection(err.to_string()))?;
        Ok(Self {
            http,
            select_url: config.select_url(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn select_url(&self) -> &str {
        &self.select_url
    }

    fn transport_error(&self, err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            EngineError::Connection(err.to_string())
        }
    }
}

impl SearchEngine for HttpSearchEngine {
    fn execute(&self, request: &EngineRequest) -> Result<EngineResponse> {
        let params = request.to_solr_params();
        debug!(url = %self.select_url, params = params.len(), "querying search index");
        let resp = self
            .http
            .post(&self.select_url)
            .form(&params)
            .send()
            .map_err(|err| self.transport_error(err))?;
        let status = resp.status();
        let body = resp.text().map_err(|err| self.transport_error(err))?;
        if !status.is_success() {
            warn!(%status, "search index request failed");
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(EngineResponse::from_solr_json(&body)?)
    }
}
