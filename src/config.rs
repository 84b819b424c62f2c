use crate::error::ServiceError;
use crate::util::parse_region;
use rusoto_core::Region;
use std::env;
use std::fmt;

pub const DEFAULT_SCORING_BASE_URL: &str = "https://api.alumai.com";
pub const DEFAULT_AUDIT_BUCKET: &str = "verikai-api";
pub const DEFAULT_REGION: &str = "us-west-2";

/// Process-wide settings, read once at start-up.
#[derive(Clone)]
pub struct Config {
    pub customer_id: String,
    pub campaign_id: String,
    pub api_key: String,
    pub scoring_base_url: String,
    pub audit_bucket: String,
    pub region: Region,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("customer_id", &self.customer_id)
            .field("campaign_id", &self.campaign_id)
            .field("api_key", &"<redacted>")
            .field("scoring_base_url", &self.scoring_base_url)
            .field("audit_bucket", &self.audit_bucket)
            .field("region", &self.region)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let scoring_base_url = optional("SCORING_BASE_URL", DEFAULT_SCORING_BASE_URL);
        if !scoring_base_url.starts_with("http://") && !scoring_base_url.starts_with("https://") {
            return Err(ServiceError::internal_server_error(
                "SCORING_BASE_URL must start with http:// or https://",
            ));
        }

        let config = Config {
            customer_id: required(&lookup, "CUSTOMER_ID")?,
            campaign_id: required(&lookup, "CAMPAIGN_ID")?,
            api_key: required(&lookup, "API_KEY")?,
            scoring_base_url,
            audit_bucket: optional("AUDIT_BUCKET", DEFAULT_AUDIT_BUCKET),
            region: parse_region(&optional("REGION", DEFAULT_REGION))?,
        };

        tracing::info!("Configuration loaded");
        tracing::debug!(
            scoring_base_url = %config.scoring_base_url,
            audit_bucket = %config.audit_bucket,
            region = config.region.name(),
            "Configuration details"
        );
        Ok(config)
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, ServiceError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(ServiceError::internal_server_error(format!(
            "Environment variable '{}' cannot be empty",
            name
        ))),
        None => Err(ServiceError::internal_server_error(format!(
            "Environment variable '{}' not found",
            name
        ))),
    }
}
