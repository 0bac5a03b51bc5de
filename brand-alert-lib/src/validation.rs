//! Parameter validation for BrandAlert API calls.
//!
//! Every function here fails loudly with [`BrandAlertError::Parameter`]; no
//! request is sent unless all parameters pass. The `*_value` variants accept
//! dynamically typed JSON input and apply strict type checks on it.

use crate::error::BrandAlertError;
use crate::options::{Mode, ResponseFormat};
use chrono::{Duration, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref API_KEY_FORMAT: Regex = Regex::new(r"(?i)^at_[a-z0-9]{29}$").unwrap();
    static ref SINCE_DATE_FORMAT: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Oldest accepted since-date, in days before today.
pub const MAX_SINCE_DATE_AGE_DAYS: i64 = 14;

/// Validate the API key format (`at_` followed by 29 alphanumerics).
pub fn validate_api_key(value: &str) -> Result<String, BrandAlertError> {
    if API_KEY_FORMAT.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(BrandAlertError::parameter("Invalid API key format."))
    }
}

/// Filter a term list down to its non-empty entries, keeping order.
///
/// # Errors
///
/// Fails when `required` is set and no term survives filtering.
pub fn validate_terms<S: AsRef<str>>(
    values: &[S],
    required: bool,
) -> Result<Vec<String>, BrandAlertError> {
    let filtered: Vec<String> = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();

    if required && filtered.is_empty() {
        return Err(BrandAlertError::parameter("No valid terms in a list"));
    }
    Ok(filtered)
}

/// Validate a dynamically typed term list.
///
/// The value must be a JSON array. Null and empty-string entries are
/// dropped; other scalars are stringified.
pub fn validate_terms_value(
    value: &Value,
    required: bool,
) -> Result<Vec<String>, BrandAlertError> {
    let items = value
        .as_array()
        .ok_or_else(|| BrandAlertError::parameter("Parameter should be a list"))?;

    let terms: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();

    validate_terms(&terms, required)
}

/// Check that `value` lies within the last [`MAX_SINCE_DATE_AGE_DAYS`] days.
///
/// Both ends are inclusive: `today` and `today - 14` are accepted, future
/// dates are not.
pub fn validate_since_date(
    value: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, BrandAlertError> {
    let age = (today - value).num_days();
    if (0..=MAX_SINCE_DATE_AGE_DAYS).contains(&age) {
        Ok(value)
    } else {
        Err(BrandAlertError::parameter("Incorrect since_date value."))
    }
}

/// Validate a dynamically typed since-date given as a `YYYY-MM-DD` string.
pub fn validate_since_date_value(
    value: &Value,
    today: NaiveDate,
) -> Result<NaiveDate, BrandAlertError> {
    let date = value
        .as_str()
        .filter(|raw| SINCE_DATE_FORMAT.is_match(raw))
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .ok_or_else(|| BrandAlertError::parameter("Incorrect since_date value."))?;
    validate_since_date(date, today)
}

/// Accept only a real JSON boolean. `null`, `"True"`, `1` and the like fail.
pub fn validate_bool(value: &Value) -> Result<bool, BrandAlertError> {
    value
        .as_bool()
        .ok_or_else(|| BrandAlertError::parameter("The value should be true or false."))
}

/// Case-insensitive match against `preview` and `purchase`.
pub fn validate_mode(value: &str) -> Result<Mode, BrandAlertError> {
    match value.to_lowercase().as_str() {
        "preview" => Ok(Mode::Preview),
        "purchase" => Ok(Mode::Purchase),
        _ => Err(BrandAlertError::parameter(format!(
            "Incorrect mode '{}', expected preview or purchase.",
            value
        ))),
    }
}

/// Case-insensitive match against `json` and `xml`.
pub fn validate_response_format(value: &str) -> Result<ResponseFormat, BrandAlertError> {
    match value.to_lowercase().as_str() {
        "json" => Ok(ResponseFormat::Json),
        "xml" => Ok(ResponseFormat::Xml),
        _ => Err(BrandAlertError::parameter(
            "Output format should be either JSON or XML.",
        )),
    }
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Since-date used when the caller does not give one: yesterday.
pub fn default_since_date(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}
