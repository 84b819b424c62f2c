use crate::response::Status;
use serde::Serialize;
use serde_json;
use std::error;
use std::fmt;

/// Failures raised while decoding or normalizing a payload. Both kinds surface as a 400.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("{0}")]
    MalformedInput(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(&'static str),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ServiceError {
    pub msg: String,
    pub status: Status,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl error::Error for ServiceError {}

impl ServiceError {
    pub fn bad_request<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            status: Status::BadRequest,
        }
    }

    pub fn internal_server_error<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            status: Status::InternalServerError,
        }
    }

    /// Carries the scoring API's own status code and raw body text.
    pub fn upstream<T: std::fmt::Display>(code: u16, msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            status: Status::from_code(code),
        }
    }
}

impl From<TranscodeError> for ServiceError {
    fn from(err: TranscodeError) -> Self {
        ServiceError::bad_request(err)
    }
}
