//! Request payload for the BrandAlert API.

use crate::options::{Mode, ResponseFormat};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Body of a BrandAlert POST request, with the API's field names.
///
/// Built only from already validated values.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub api_key: String,
    pub include_search_terms: Vec<String>,
    pub exclude_search_terms: Vec<String>,
    pub mode: Mode,
    /// Serialized as `YYYY-MM-DD`
    pub since_date: NaiveDate,
    pub with_typos: bool,
    pub punycode: bool,
    pub response_format: ResponseFormat,
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("api_key", &redact_api_key(&self.api_key))
            .field("include_search_terms", &self.include_search_terms)
            .field("exclude_search_terms", &self.exclude_search_terms)
            .field("mode", &self.mode)
            .field("since_date", &self.since_date)
            .field("with_typos", &self.with_typos)
            .field("punycode", &self.punycode)
            .field("response_format", &self.response_format)
            .finish()
    }
}

/// Masked form of an API key for debug output. Only the `at_` prefix of a
/// key is kept; an empty key stays empty.
pub(crate) fn redact_api_key(api_key: &str) -> &'static str {
    if api_key.is_empty() {
        ""
    } else if api_key.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("at_")) {
        "at_***"
    } else {
        "***"
    }
}

/// Validated fields of one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub include_terms: Vec<String>,
    pub exclude_terms: Vec<String>,
    pub mode: Mode,
    pub since_date: NaiveDate,
    pub with_typos: bool,
    pub punycode: bool,
    pub response_format: ResponseFormat,
}

/// Assemble the request payload. Pure and deterministic.
pub fn build_payload(api_key: &str, params: SearchParams) -> Payload {
    Payload {
        api_key: api_key.to_string(),
        include_search_terms: params.include_terms,
        exclude_search_terms: params.exclude_terms,
        mode: params.mode,
        since_date: params.since_date,
        with_typos: params.with_typos,
        punycode: params.punycode,
        response_format: params.response_format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_field_names() {
        let params = SearchParams {
            include_terms: vec!["google".to_string(), "blog".to_string()],
            exclude_terms: vec!["test".to_string()],
            mode: Mode::Purchase,
            since_date: NaiveDate::from_ymd_opt(2020, 7, 26).unwrap(),
            with_typos: true,
            punycode: false,
            response_format: ResponseFormat::Xml,
        };
        let payload = build_payload("at_00000000000000000000000000000", params);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "apiKey": "at_00000000000000000000000000000",
                "includeSearchTerms": ["google", "blog"],
                "excludeSearchTerms": ["test"],
                "mode": "purchase",
                "sinceDate": "2020-07-26",
                "withTypos": true,
                "punycode": false,
                "responseFormat": "XML"
            })
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let params = SearchParams {
            include_terms: vec!["google".to_string()],
            exclude_terms: Vec::new(),
            mode: Mode::Preview,
            since_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            with_typos: false,
            punycode: true,
            response_format: ResponseFormat::Json,
        };
        let payload = build_payload("at_00000000000000000000000000000", params);
        let debug = format!("{:?}", payload);

        assert!(!debug.contains("at_00000000000000000000000000000"), "{}", debug);
        assert!(debug.contains("at_***"));
        assert!(debug.contains("google"));

        assert_eq!(redact_api_key(""), "");
        assert_eq!(redact_api_key("AT_abc"), "at_***");
        assert_eq!(redact_api_key("key"), "***");
    }

    #[test]
    fn test_payload_is_deterministic() {
        let params = SearchParams {
            include_terms: vec!["a".to_string()],
            exclude_terms: Vec::new(),
            mode: Mode::Preview,
            since_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            with_typos: false,
            punycode: true,
            response_format: ResponseFormat::Json,
        };
        let first = build_payload("key", params.clone());
        let second = build_payload("key", params);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
