use crate::dto::{NormalizedBatch, NormalizedRecord, Pii, RawRecord};
use crate::error::TranscodeError;
use crate::parse::{
    parse_address, parse_dob, parse_gender, parse_name, parse_phone, INVALID_REQUEST,
};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const EMPTY_REQUEST: &str = "Request is empty.";
pub const INVALID_REQUEST_DATA: &str = "Invalid request data.";
pub const EMPTY_RESPONSE: &str = "Response body is empty.";

/// Fields copied from the scoring response into the public one.
pub const PUBLIC_FIELDS: [&str; 3] = ["runTime", "memberO2Scores", "state"];

type Result<T> = std::result::Result<T, TranscodeError>;

/// Normalizes one census entry. A falsy entry is rejected; a non-object entry
/// carries no fields and fails on the name.
pub fn normalize_record(item: &Value) -> Result<NormalizedRecord> {
    if !is_truthy(item) {
        return Err(TranscodeError::Validation(INVALID_REQUEST));
    }
    let record = match item {
        Value::Object(_) => RawRecord::deserialize(item)?,
        _ => RawRecord::default(),
    };
    normalize_fields(&record)
}

/// Fields are parsed in a fixed order and the first failure is returned as is.
fn normalize_fields(record: &RawRecord) -> Result<NormalizedRecord> {
    let name = parse_name(record.name.as_deref())?;
    let dob = parse_dob(record.dob.as_deref())?;
    let address = parse_address(record.address.as_deref())?;
    let phone = parse_phone(record.phone.as_deref())?;
    let sex = parse_gender(record.gender.as_deref())?;
    Ok(NormalizedRecord {
        pii: Pii {
            first_name: name.first,
            last_name: name.last,
            dob,
            address: address.street,
            city: address.city,
            state: address.state,
            zip: address.zip,
            phone,
            sex,
        },
    })
}

/// All-or-nothing: one bad record rejects the whole batch.
pub fn normalize_batch(data: &Value) -> Result<NormalizedBatch> {
    if !is_truthy(data) {
        return Err(TranscodeError::Validation(EMPTY_REQUEST));
    }
    let census = data
        .get("Census")
        .filter(|census| is_truthy(census))
        .ok_or(TranscodeError::Validation(INVALID_REQUEST_DATA))?;
    let rows = match census {
        Value::Array(records) => records
            .iter()
            .map(normalize_record)
            .collect::<Result<Vec<_>>>()?,
        // A string census is indexed per character, none of which is a record.
        Value::String(_) => return Err(TranscodeError::Validation(INVALID_REQUEST)),
        // Numbers, booleans and objects have no length and yield no rows.
        _ => Vec::new(),
    };
    Ok(NormalizedBatch { rows })
}

/// Decodes an inbound JSON body and normalizes it.
pub fn decode_request(body: &str) -> Result<NormalizedBatch> {
    let data: Value = serde_json::from_str(body)?;
    normalize_batch(&data)
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Projects the whitelisted fields present on the scoring response, untouched.
pub fn reduce_response(data: &Value) -> Result<Value> {
    if !is_truthy(data) {
        return Err(TranscodeError::Validation(EMPTY_RESPONSE));
    }
    let reduced: Map<String, Value> = PUBLIC_FIELDS
        .iter()
        .filter_map(|&field| {
            data.get(field)
                .filter(|value| is_truthy(value))
                .map(|value| (field.to_string(), value.clone()))
        })
        .collect();
    Ok(Value::Object(reduced))
}
