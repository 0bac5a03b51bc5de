//! BrandAlert API client.
//!
//! Every call runs the same pipeline: check the API key, validate all
//! parameters, build the payload, post it, and (for parsed calls) decode the
//! body into a [`Response`]. Nothing is retried and nothing is kept between
//! calls.

use crate::config::{ClientConfig, FileConfig};
use crate::error::BrandAlertError;
use crate::models::Response;
use crate::options::{Mode, ResponseFormat, SearchOptions};
use crate::payload::{build_payload, redact_api_key, SearchParams};
use crate::requester::{ApiRequester, DEFAULT_BASE_URL};
use crate::validation::{
    default_since_date, today, validate_api_key, validate_since_date, validate_terms,
};
use chrono::NaiveDate;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Client for the BrandAlert domain search API.
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// client can serve concurrent callers.
///
/// # Example
///
/// ```rust,no_run
/// use brand_alert_lib::{Client, SearchOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new("at_00000000000000000000000000000")?;
///
///     let preview = client.preview(&["google"], SearchOptions::default()).await?;
///     println!("{} matching domains", preview.domains_count);
///
///     let options = SearchOptions::default().with_exclude_terms(["blog"]);
///     for domain in client.purchase(&["google"], options).await?.domains_list {
///         println!("{}", domain);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    api_key: String,
    api_requester: ApiRequester,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &redact_api_key(&self.api_key))
            .field("api_requester", &self.api_requester)
            .finish()
    }
}

impl Client {
    /// Create a client for the production endpoint with no timeout.
    ///
    /// An empty key is accepted here; calls then fail with
    /// [`BrandAlertError::EmptyApiKey`]. A non-empty key must be well formed.
    pub fn new(api_key: &str) -> Result<Self, BrandAlertError> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Create a client with custom endpoint and timeout.
    pub fn with_config(api_key: &str, config: ClientConfig) -> Result<Self, BrandAlertError> {
        let mut client = Self {
            api_key: String::new(),
            api_requester: ApiRequester::new(config.base_url, config.timeout)?,
        };
        client.set_api_key(api_key)?;
        Ok(client)
    }

    /// Create a client from a loaded configuration file.
    pub fn from_file_config(config: &FileConfig) -> Result<Self, BrandAlertError> {
        Self::with_config(config.api_key().unwrap_or_default(), config.client_config()?)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Replace the API key. Non-empty keys are format-checked.
    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), BrandAlertError> {
        self.api_key = if api_key.is_empty() {
            String::new()
        } else {
            validate_api_key(api_key)?
        };
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api_requester.base_url()
    }

    /// Point the client at another endpoint. `None` restores the default.
    pub fn set_base_url(&mut self, base_url: Option<&str>) {
        self.api_requester
            .set_base_url(base_url.unwrap_or(DEFAULT_BASE_URL));
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api_requester.timeout()
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), BrandAlertError> {
        self.api_requester.set_timeout(timeout)
    }

    /// Count the domains matching `terms`.
    pub async fn preview<S: AsRef<str>>(
        &self,
        terms: &[S],
        options: SearchOptions,
    ) -> Result<Response, BrandAlertError> {
        self.data(terms, options.with_mode(Mode::Preview)).await
    }

    /// Fetch the list of domains matching `terms`.
    pub async fn purchase<S: AsRef<str>>(
        &self,
        terms: &[S],
        options: SearchOptions,
    ) -> Result<Response, BrandAlertError> {
        self.data(terms, options.with_mode(Mode::Purchase)).await
    }

    /// Run a search and parse the result.
    ///
    /// The response format is forced to JSON.
    ///
    /// # Errors
    ///
    /// Everything [`Client::raw_data`] returns, plus `UnparsableResponse`
    /// when the body is not JSON or lacks the `domainsCount` root field.
    /// A server error object delivered with a 2xx status falls in the
    /// latter case.
    pub async fn data<S: AsRef<str>>(
        &self,
        terms: &[S],
        options: SearchOptions,
    ) -> Result<Response, BrandAlertError> {
        let body = self
            .raw_data(terms, options.with_response_format(ResponseFormat::Json))
            .await?;
        parse_response(&body)
    }

    /// Run a search and return the body exactly as received.
    ///
    /// # Errors
    ///
    /// - `EmptyApiKey` when no API key is set
    /// - `Parameter` when any parameter fails validation; nothing is sent
    /// - `ApiAuth`, `BadRequest`, `HttpApi` for unsuccessful HTTP statuses
    /// - `Network`, `Timeout` when the server cannot be reached
    pub async fn raw_data<S: AsRef<str>>(
        &self,
        terms: &[S],
        options: SearchOptions,
    ) -> Result<String, BrandAlertError> {
        if self.api_key.is_empty() {
            return Err(BrandAlertError::EmptyApiKey);
        }

        let params = search_params(terms, options, today())?;
        debug!(
            mode = %params.mode,
            format = %params.response_format,
            since = %params.since_date,
            terms = params.include_terms.len(),
            "running BrandAlert search"
        );

        let payload = build_payload(&self.api_key, params);
        self.api_requester.post(&payload).await
    }
}

/// Validate the call inputs against `today`.
fn search_params<S: AsRef<str>>(
    terms: &[S],
    options: SearchOptions,
    today: NaiveDate,
) -> Result<SearchParams, BrandAlertError> {
    let include_terms = validate_terms(terms, true)?;
    let exclude_terms = validate_terms(&options.exclude_terms, false)?;
    let since_date = match options.since_date {
        Some(date) => validate_since_date(date, today)?,
        None => default_since_date(today),
    };

    Ok(SearchParams {
        include_terms,
        exclude_terms,
        mode: options.mode,
        since_date,
        with_typos: options.with_typos,
        punycode: options.punycode,
        response_format: options.response_format,
    })
}

/// Decode a JSON body into a [`Response`].
fn parse_response(body: &str) -> Result<Response, BrandAlertError> {
    let parsed: serde_json::Value = serde_json::from_str(body)?;
    if parsed.get("domainsCount").is_none() {
        return Err(BrandAlertError::unparsable(
            "Could not find the correct root element.",
        ));
    }
    Ok(Response::from_value(Some(&parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "at_00000000000000000000000000000";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_client_defaults() {
        let client = Client::new(API_KEY).unwrap();
        assert_eq!(client.api_key(), API_KEY);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert!(client.timeout().is_none());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        assert!(matches!(
            Client::new("not-a-key"),
            Err(BrandAlertError::Parameter { .. })
        ));
        assert!(Client::new("").is_ok());
    }

    #[test]
    fn test_setters() {
        let mut client = Client::new(API_KEY).unwrap();

        client.set_base_url(Some("http://localhost:1234"));
        assert_eq!(client.base_url(), "http://localhost:1234");
        client.set_base_url(None);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);

        client.set_timeout(Some(Duration::from_secs(7))).unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_secs(7)));

        assert!(client.set_api_key("bad").is_err());
        assert_eq!(client.api_key(), API_KEY);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = Client::new(API_KEY).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains(API_KEY), "{}", debug);
        assert!(debug.contains("at_***"));
        assert!(debug.contains(DEFAULT_BASE_URL));

        let keyless = format!("{:?}", Client::new("").unwrap());
        assert!(keyless.contains("api_key: \"\""));
    }

    #[test]
    fn test_search_params_defaults() {
        let today = date(2024, 3, 1);
        let params = search_params(&["test", ""], SearchOptions::default(), today).unwrap();
        assert_eq!(params.include_terms, vec!["test"]);
        assert!(params.exclude_terms.is_empty());
        assert_eq!(params.since_date, date(2024, 2, 29));
        assert_eq!(params.mode, Mode::Preview);
        assert_eq!(params.response_format, ResponseFormat::Json);
        assert!(!params.with_typos);
        assert!(params.punycode);
    }

    #[test]
    fn test_search_params_validation() {
        let today = date(2024, 3, 10);
        let empty: [&str; 0] = [];
        assert!(search_params(&empty, SearchOptions::default(), today).is_err());

        let too_old = SearchOptions::default().with_since_date(date(2024, 2, 24));
        assert!(search_params(&["test"], too_old, today).is_err());

        let future = SearchOptions::default().with_since_date(date(2024, 3, 11));
        assert!(search_params(&["test"], future, today).is_err());

        let oldest = SearchOptions::default().with_since_date(date(2024, 2, 25));
        assert!(search_params(&["test"], oldest, today).is_ok());
    }

    #[test]
    fn test_parse_response() {
        let response = parse_response(r#"{"domainsCount": 3}"#).unwrap();
        assert_eq!(response.domains_count, 3);
        assert!(response.domains_list.is_empty());

        assert!(matches!(
            parse_response(r#"{"code": 403, "messages": "Access restricted."}"#),
            Err(BrandAlertError::UnparsableResponse { source: None, .. })
        ));
        assert!(matches!(
            parse_response("<?xml version=\"1.0\"?><x/>"),
            Err(BrandAlertError::UnparsableResponse { source: Some(_), .. })
        ));
        assert!(parse_response("[1, 2]").is_err());
    }
}
