use crate::audit::{log_to_file, AuditLog, RESULT_KEY, TRANSCODED_KEY};
use crate::dto::GatewayEvent;
use crate::error::{ServiceError, TranscodeError};
use crate::normalize::{decode_request, reduce_response};
use crate::scoring::ScoringClient;
use serde_json::Value;

pub const EMPTY_BODY: &str = "Empty request body.";

/// Request pipeline: normalize the census, forward it for scoring, reduce the answer.
pub struct Gateway<A> {
    scoring: ScoringClient,
    audit: A,
}

impl<A: AuditLog> Gateway<A> {
    pub fn new(scoring: ScoringClient, audit: A) -> Self {
        Gateway { scoring, audit }
    }

    pub async fn transcode(&self, event: GatewayEvent) -> Result<Value, ServiceError> {
        let body = event
            .body
            .filter(|body| !body.is_empty())
            .ok_or_else(|| ServiceError::bad_request(EMPTY_BODY))?;

        let batch = decode_request(&body).map_err(|err| {
            tracing::info!(error = %err, "Rejected census request");
            ServiceError::from(err)
        })?;
        tracing::info!(rows = batch.rows.len(), "Census normalized");
        log_to_file(&self.audit, TRANSCODED_KEY, &batch).await;

        let response = self.scoring.send_census(&batch).await?;
        if response.status >= 400 {
            tracing::warn!(status = response.status, "Scoring API returned an error");
            return Err(ServiceError::upstream(response.status, response.body));
        }

        let data: Value = serde_json::from_str(&response.body).map_err(|err| {
            tracing::info!(error = %err, "Unreadable scoring response");
            TranscodeError::from(err)
        })?;
        log_to_file(&self.audit, RESULT_KEY, &data).await;
        let reduced = reduce_response(&data)?;
        tracing::debug!("Scoring response reduced");
        Ok(reduced)
    }
}
