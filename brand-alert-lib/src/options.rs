//! Per-call search options.
//!
//! [`SearchOptions`] replaces a loose options bag with named fields and
//! documented defaults. [`SearchOptions::from_value`] still accepts a
//! dynamic JSON object for callers that load options from elsewhere.

use crate::error::BrandAlertError;
use crate::validation::{
    validate_bool, validate_mode, validate_response_format, validate_since_date_value,
    validate_terms_value,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// What the API should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Only the number of matching domains
    #[default]
    #[serde(rename = "preview")]
    Preview,

    /// The full list of matching domain records
    #[serde(rename = "purchase")]
    Purchase,
}

/// Body format requested from the API.
///
/// Only JSON is parsed by the client; XML is available through raw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseFormat {
    #[default]
    #[serde(rename = "JSON")]
    Json,

    #[serde(rename = "XML")]
    Xml,
}

impl Mode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Preview => "preview",
            Mode::Purchase => "purchase",
        }
    }
}

impl ResponseFormat {
    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "JSON",
            ResponseFormat::Xml => "XML",
        }
    }
}

impl FromStr for Mode {
    type Err = BrandAlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_mode(s)
    }
}

impl FromStr for ResponseFormat {
    type Err = BrandAlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_response_format(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters for a search call.
///
/// Defaults: no excluded terms, since yesterday, no typos, punycode on,
/// JSON, preview mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Terms that must not appear in matched domain names
    pub exclude_terms: Vec<String>,

    /// Oldest change date to report. `None` means yesterday.
    pub since_date: Option<NaiveDate>,

    /// Expand search terms with likely typo variants
    pub with_typos: bool,

    /// Return internationalized domain names in punycode
    pub punycode: bool,

    /// Body format. Parsed calls always use JSON.
    pub response_format: ResponseFormat,

    /// Preview or purchase. The convenience calls override this.
    pub mode: Mode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            exclude_terms: Vec::new(),
            since_date: None,
            with_typos: false,
            punycode: true,
            response_format: ResponseFormat::Json,
            mode: Mode::Preview,
        }
    }
}

impl SearchOptions {
    pub fn with_exclude_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_since_date(mut self, date: NaiveDate) -> Self {
        self.since_date = Some(date);
        self
    }

    pub fn with_typos(mut self, enabled: bool) -> Self {
        self.with_typos = enabled;
        self
    }

    pub fn with_punycode(mut self, enabled: bool) -> Self {
        self.punycode = enabled;
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Build options from a dynamic JSON object.
    ///
    /// Recognized keys: `exclude_terms`, `since_date` (`YYYY-MM-DD`),
    /// `with_typos`, `punycode`, `response_format`, `mode`. A present key is
    /// validated strictly, so `"with_typos": null` or `"punycode": "True"`
    /// fail. Unknown keys are ignored.
    pub fn from_value(value: &Value, today: NaiveDate) -> Result<Self, BrandAlertError> {
        let map = value
            .as_object()
            .ok_or_else(|| BrandAlertError::parameter("Options should be an object"))?;

        let mut options = Self::default();
        for (key, item) in map {
            match key.as_str() {
                "exclude_terms" => options.exclude_terms = validate_terms_value(item, false)?,
                "since_date" => {
                    options.since_date = Some(validate_since_date_value(item, today)?)
                }
                "with_typos" => options.with_typos = validate_bool(item)?,
                "punycode" => options.punycode = validate_bool(item)?,
                "response_format" => {
                    options.response_format = validate_response_format(text(item)?)?
                }
                "mode" => options.mode = validate_mode(text(item)?)?,
                other => debug!(option = other, "ignoring unrecognized search option"),
            }
        }
        Ok(options)
    }
}

fn text(value: &Value) -> Result<&str, BrandAlertError> {
    value
        .as_str()
        .ok_or_else(|| BrandAlertError::parameter(format!("Expected a string, got {}", value)))
}
