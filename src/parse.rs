//! Per-field parsers turning loosely formatted census strings into the
//! scoring API's layout. Each parser rejects an absent or empty value.

use crate::error::TranscodeError;
use std::ops::Range;

pub const INVALID_REQUEST: &str = "Invalid request.";
pub const INVALID_DOB: &str = "Invalid date of birth.";
pub const INVALID_ADDRESS: &str = "Invalid address.";
pub const INVALID_PHONE: &str = "Invalid phone number.";
pub const INVALID_GENDER: &str = "Invalid gender.";

/// Character positions of the two-character separator dropped from a date of birth.
pub const DOB_SEPARATOR: Range<usize> = 6..8;

type Result<T> = std::result::Result<T, TranscodeError>;

pub struct Name {
    pub first: String,
    pub last: String,
}

pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

fn required<'a>(value: Option<&'a str>, msg: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(TranscodeError::Validation(msg)),
    }
}

/// First space-separated token is the first name, the last token (if any other) the last name.
pub fn parse_name(full: Option<&str>) -> Result<Name> {
    let full = required(full, INVALID_REQUEST)?;
    let tokens: Vec<&str> = full.split(' ').collect();
    let first = tokens[0].to_string();
    let last = match tokens.len() {
        1 => String::new(),
        n => tokens[n - 1].to_string(),
    };
    Ok(Name { first, last })
}

pub fn parse_dob(dob: Option<&str>) -> Result<String> {
    let dob = required(dob, INVALID_DOB)?;
    Ok(dob
        .chars()
        .enumerate()
        .filter(|(i, _)| !DOB_SEPARATOR.contains(i))
        .map(|(_, c)| c)
        .collect())
}

/// Expects `street, city, STATE ZIP`.
pub fn parse_address(address: Option<&str>) -> Result<Address> {
    let address = required(address, INVALID_ADDRESS)?;
    let invalid = || TranscodeError::Validation(INVALID_ADDRESS);
    let segments: Vec<&str> = address.split(", ").collect();
    let [street, city, state_zip] = segments[..] else {
        return Err(invalid());
    };
    let tokens: Vec<&str> = state_zip.split(' ').collect();
    let [state, zip] = tokens[..] else {
        return Err(invalid());
    };
    Ok(Address {
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
    })
}

pub fn parse_phone(phone: Option<&str>) -> Result<String> {
    required(phone, INVALID_PHONE).map(str::to_string)
}

pub fn parse_gender(gender: Option<&str>) -> Result<String> {
    let gender = required(gender, INVALID_GENDER)?;
    let first = gender
        .chars()
        .next()
        .ok_or(TranscodeError::Validation(INVALID_GENDER))?;
    Ok(first.to_uppercase().collect())
}
