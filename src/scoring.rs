use crate::config::Config;
use crate::dto::NormalizedBatch;
use crate::error::ServiceError;

const TRANSPORT_FALLBACK: &str = "Internal server error.";

/// Status and raw body text returned by the scoring API.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Posts normalized census batches to the scoring API. Redirects are returned, never followed.
pub struct ScoringClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ScoringClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(ServiceError::internal_server_error)?;
        let endpoint = format!(
            "{}/census/v1/customer/{}/campaign/{}/inline/test",
            config.scoring_base_url.trim_end_matches('/'),
            config.customer_id,
            config.campaign_id
        );
        Ok(ScoringClient {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Any HTTP status is returned as a response; only transport failures are errors.
    pub async fn send_census(
        &self,
        batch: &NormalizedBatch,
    ) -> Result<UpstreamResponse, ServiceError> {
        tracing::debug!(endpoint = %self.endpoint, rows = batch.rows.len(), "Sending census");
        let response = self
            .client
            .post(self.endpoint.as_str())
            .header("x-api-key", self.api_key.as_str())
            .header("Content-Type", "application/json")
            .json(batch)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(UpstreamResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    let msg = err.to_string();
    tracing::warn!(error = %msg, "Scoring API unreachable");
    if msg.is_empty() {
        ServiceError::internal_server_error(TRANSPORT_FALLBACK)
    } else {
        ServiceError::internal_server_error(msg)
    }
}
