//! Response models for the BrandAlert API.
//!
//! Constructors here never fail: missing or malformed fields fall back to
//! defaults. Strict checking belongs to parameter validation.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

lazy_static! {
    static ref DATE_FORMAT: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// One matched or changed domain record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// The domain name (e.g., "googleblog.asia")
    pub domain_name: String,

    /// What happened to the domain (e.g., "added", "dropped")
    pub action: String,

    /// Date of the change, if the server sent a well-formed one
    pub date: Option<NaiveDate>,
}

/// Result of a preview or purchase call.
///
/// Preview responses usually carry only the count; purchase responses
/// also fill `domains_list`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub domains_count: i64,
    pub domains_list: Vec<Domain>,
}

/// Structured error payload returned in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorMessage {
    pub code: i64,

    /// Sent by the server under the plural key `messages`
    #[serde(rename = "messages")]
    pub message: String,
}

impl Domain {
    /// Build a domain record from a decoded JSON value.
    ///
    /// Never fails: absent or non-object input gives an empty record.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(values) => Self {
                domain_name: string_value(values, "domainName"),
                action: string_value(values, "action"),
                date: date_value(values, "date"),
            },
            None => Self::default(),
        }
    }
}

impl Response {
    /// Build a response from a decoded JSON value.
    ///
    /// Never fails: absent fields default to a zero count and an empty list.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(values) => Self {
                domains_count: int_value(values, "domainsCount"),
                domains_list: values
                    .get("domainsList")
                    .and_then(|list| list.as_array())
                    .map(|list| list.iter().map(|d| Domain::from_value(Some(d))).collect())
                    .unwrap_or_default(),
            },
            None => Self::default(),
        }
    }

    /// Whether the response carries no domain records.
    pub fn is_empty(&self) -> bool {
        self.domains_list.is_empty()
    }
}

impl ErrorMessage {
    /// Build an error message from a decoded JSON value.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(values) => Self {
                code: int_value(values, "code"),
                message: string_value(values, "messages"),
            },
            None => Self::default(),
        }
    }

    /// Surface this message through the crate error type.
    pub fn into_error(self) -> crate::BrandAlertError {
        crate::BrandAlertError::Response { error: self }
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(Some(&value)))
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(Some(&value)))
    }
}

impl<'de> Deserialize<'de> for ErrorMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(Some(&value)))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{} ({}, {})", self.domain_name, self.action, date),
            None => write!(f, "{} ({})", self.domain_name, self.action),
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Read a field as text. Scalars other than strings are stringified;
/// null, objects and arrays count as missing.
fn string_value(values: &Value, key: &str) -> String {
    match values.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read a field as an integer. Accepts JSON integers, whole floats and
/// integer strings; anything else is 0.
fn int_value(values: &Value, key: &str) -> i64 {
    match values.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Read a `YYYY-MM-DD` field. Other shapes, and impossible dates such as
/// `2020-13-45`, yield `None`.
fn date_value(values: &Value, key: &str) -> Option<NaiveDate> {
    let raw = values.get(key)?.as_str()?;
    if !DATE_FORMAT.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RESPONSE_OK: &str = r#"{
        "domainsCount": 2,
        "domainsList": [
            {
                "domainName": "blogginggoogle.com",
                "action": "added",
                "date": "2020-07-26"
            },
            {
                "domainName": "googleblog.asia",
                "action": "dropped",
                "date": "2020-07-26"
            }
        ]
    }"#;

    const RESPONSE_ERROR: &str = r#"{
        "code": 403,
        "messages": "Access restricted. Check credits balance or enter the correct API key."
    }"#;

    #[test]
    fn test_response_parsing() {
        let raw: Value = serde_json::from_str(RESPONSE_OK).unwrap();
        let parsed = Response::from_value(Some(&raw));

        assert_eq!(parsed.domains_count, 2);
        assert_eq!(parsed.domains_list.len(), 2);

        let first = &parsed.domains_list[0];
        assert_eq!(first.domain_name, "blogginggoogle.com");
        assert_eq!(first.action, "added");
        assert_eq!(first.date.unwrap().to_string(), "2020-07-26");

        let second = &parsed.domains_list[1];
        assert_eq!(second.domain_name, "googleblog.asia");
        assert_eq!(second.action, "dropped");
        assert_eq!(second.date.unwrap().to_string(), "2020-07-26");
    }

    #[test]
    fn test_error_parsing() {
        let raw: Value = serde_json::from_str(RESPONSE_ERROR).unwrap();
        let parsed = ErrorMessage::from_value(Some(&raw));

        assert_eq!(parsed.code, 403);
        assert_eq!(
            parsed.message,
            "Access restricted. Check credits balance or enter the correct API key."
        );
    }

    #[test]
    fn test_absent_input_gives_defaults() {
        assert_eq!(Domain::from_value(None), Domain::default());
        assert_eq!(Response::from_value(None), Response::default());
        assert_eq!(ErrorMessage::from_value(None), ErrorMessage::default());

        let empty = json!({});
        let response = Response::from_value(Some(&empty));
        assert_eq!(response.domains_count, 0);
        assert!(response.is_empty());

        let error = ErrorMessage::from_value(Some(&empty));
        assert_eq!(error.code, 0);
        assert_eq!(error.message, "");
    }

    #[test]
    fn test_malformed_fields_are_tolerated() {
        let raw = json!({
            "domainsCount": "7",
            "domainsList": {"not": "a list"}
        });
        let response = Response::from_value(Some(&raw));
        assert_eq!(response.domains_count, 7);
        assert!(response.domains_list.is_empty());

        let raw = json!({"domainsCount": null, "domainsList": [null, 5]});
        let response = Response::from_value(Some(&raw));
        assert_eq!(response.domains_count, 0);
        assert_eq!(response.domains_list, vec![Domain::default(), Domain::default()]);
    }

    #[test]
    fn test_bad_dates_become_none() {
        let bad_dates = [
            json!("26/07/2020"),
            json!("2020-7-26"),
            json!("2020-13-45"),
            json!(20200726),
            json!(null),
        ];
        for date in bad_dates {
            let raw = json!({"domainName": "a.com", "action": "added", "date": date});
            let domain = Domain::from_value(Some(&raw));
            assert_eq!(domain.domain_name, "a.com");
            assert!(domain.date.is_none(), "date {:?} should be rejected", raw["date"]);
        }
    }

    #[test]
    fn test_serde_deserialize_is_lenient() {
        let parsed: Response =
            serde_json::from_str(r#"{"domainsList": [{"action": "added"}]}"#).unwrap();
        assert_eq!(parsed.domains_count, 0);
        assert_eq!(parsed.domains_list[0].domain_name, "");
        assert_eq!(parsed.domains_list[0].action, "added");

        let parsed: ErrorMessage = serde_json::from_str(RESPONSE_ERROR).unwrap();
        assert_eq!(parsed.code, 403);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let raw: Value = serde_json::from_str(RESPONSE_OK).unwrap();
        let parsed = Response::from_value(Some(&raw));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);

        let error = ErrorMessage {
            code: 403,
            message: "denied".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"code": 403, "messages": "denied"})
        );
        assert_eq!(error.to_string(), "403: denied");
    }
}
