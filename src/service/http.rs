use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{
    AuditEntry, AuditLogResponse, ColumnsResponse, MaskRequest, MaskingService, PreviewRequest,
    PreviewResponse,
};
use crate::config::{EndpointConfig, ServiceConfig};
use crate::error::{MaskingApplyFailure, Result, RosterMaskError};
use crate::record::{Dataset, Record};

/// JSON-over-HTTP client for the masking service.
pub struct HttpMaskingService {
    client: reqwest::Client,
    base_url: String,
    endpoints: EndpointConfig,
}

impl HttpMaskingService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("roster-mask/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        if !config.use_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|e| RosterMaskError::FetchFailure {
            resource: "http client".into(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.url(&self.endpoints.records), id)
    }

    /// GET a JSON document. Every failure is a `FetchFailure` for `resource`.
    async fn fetch<T: DeserializeOwned>(&self, resource: &str, url: &str) -> Result<T> {
        tracing::debug!(%url, resource, "fetching");
        let fetch_failure = |reason: String| RosterMaskError::FetchFailure {
            resource: resource.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_failure(e.to_string()))?;

        if !response.status().is_success() {
            let (status, body) = error_parts(response).await;
            return Err(fetch_failure(format!("status={status}, body={body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| fetch_failure(format!("invalid response JSON: {e}")))
    }

    /// Send a write request whose response body is informational only.
    async fn write(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request.send().await.map_err(|e| RosterMaskError::FetchFailure {
            resource: "records".into(),
            reason: e.to_string(),
        })?;
        if !response.status().is_success() {
            let (status, body) = error_parts(response).await;
            return Err(RosterMaskError::Api { status, body });
        }
        Ok(())
    }

    /// POST a masking call. Failures are `MaskingApply` errors.
    async fn post_masking<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| MaskingApplyFailure::Service {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let (status, body) = error_parts(response).await;
            return Err(MaskingApplyFailure::Api { status, body }.into());
        }

        response.json::<T>().await.map_err(|e| {
            RosterMaskError::from(MaskingApplyFailure::MalformedResponseShape {
                reason: format!("invalid response JSON: {e}"),
            })
        })
    }
}

async fn error_parts(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

#[async_trait]
impl MaskingService for HttpMaskingService {
    async fn columns(&self) -> Result<Vec<String>> {
        let url = self.url(&self.endpoints.columns);
        let response: ColumnsResponse = self.fetch("columns", &url).await?;
        Ok(response.columns)
    }

    async fn list_records(&self) -> Result<Dataset> {
        let url = self.url(&self.endpoints.records);
        self.fetch("records", &url).await
    }

    async fn get_record(&self, id: &str) -> Result<Record> {
        let url = self.record_url(id);
        self.fetch("record", &url).await
    }

    async fn create_record(&self, record: &Record) -> Result<()> {
        let url = self.url(&self.endpoints.records);
        tracing::debug!(%url, "creating record");
        self.write(self.client.post(&url).json(record)).await
    }

    async fn update_record(&self, id: &str, record: &Record) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!(%url, "updating record");
        self.write(self.client.put(&url).json(record)).await
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!(%url, "deleting record");
        self.write(self.client.delete(&url)).await
    }

    async fn preview(&self, request: &PreviewRequest) -> Result<Dataset> {
        let url = self.url(&self.endpoints.preview);
        tracing::debug!(%url, sample_size = request.sample_size, "requesting preview");
        let response: PreviewResponse = self.post_masking(&url, request).await?;
        Ok(response.into_records())
    }

    async fn mask(&self, request: &MaskRequest) -> Result<Dataset> {
        let url = self.url(&self.endpoints.mask);
        tracing::debug!(%url, records = request.data.len(), "requesting masking");
        self.post_masking(&url, request).await
    }

    async fn audit_logs(&self) -> Result<Vec<AuditEntry>> {
        let url = self.url(&self.endpoints.audit);
        let response: AuditLogResponse = self.fetch("audit log", &url).await?;
        Ok(response.logs)
    }
}
