use serde::{de, Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;

use crate::error::ServiceError;

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    InternalServerError,
    /// Any other code, passed through from the scoring API.
    Other(u16),
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::InternalServerError => 500,
            Status::Other(code) => *code,
        }
    }

    pub fn from_code(code: u16) -> Status {
        match code {
            200 => Status::Ok,
            400 => Status::BadRequest,
            500 => Status::InternalServerError,
            other => Status::Other(other),
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.code())
    }
}

struct StatusCodeVisitor;

impl<'de> de::Visitor<'de> for StatusCodeVisitor {
    type Value = Status;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an HTTP status code")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u16::try_from(v)
            .map(Status::from_code)
            .map_err(|_| de::Error::custom(v.to_string()))
    }
}

impl<'de> de::Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_u16(StatusCodeVisitor)
    }
}

/// API Gateway proxy response. `body` is the JSON-encoded payload.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub status_code: Status,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ResponsePayload {
    pub fn from_result(result: Result<Value, ServiceError>) -> ResponsePayload {
        let headers = HashMap::from([(String::from("Content-Type"), String::from(CONTENT_TYPE))]);
        let (status_code, body) = match result {
            Err(err) => (err.status, json!({ "error": err.msg })),
            Ok(body) => (Status::Ok, body),
        };
        ResponsePayload {
            status_code,
            headers,
            body: body.to_string(),
        }
    }
}

pub fn make_response_payload(
    result: Result<Value, ServiceError>,
) -> Result<Value, lambda_runtime::Error> {
    serde_json::to_value(ResponsePayload::from_result(result)).map_err(lambda_runtime::Error::from)
}
