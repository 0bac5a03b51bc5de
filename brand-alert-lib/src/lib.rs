//! # Brand Alert Library
//!
//! A typed client for the BrandAlert API, which reports newly registered and
//! recently changed domain names matching a set of search terms.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brand_alert_lib::{Client, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("at_00000000000000000000000000000")?;
//!     let response = client.preview(&["google"], SearchOptions::default()).await?;
//!
//!     println!("Matching domains: {}", response.domains_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Preview and purchase**: count matches or fetch the full domain list
//! - **Strict validation**: bad parameters fail before any request is sent
//! - **Lenient parsing**: partial API responses still produce typed models
//! - **Typed errors**: authentication, bad request and HTTP failures are distinct
//! - **Configurable**: endpoint and timeout from code, TOML files or environment

// Re-export main public API types and functions
// This makes them available as brand_alert_lib::TypeName
pub use client::Client;
pub use config::{
    load_env_config, load_env_config_from, ClientConfig, ClientSection, ConfigManager, EnvConfig,
    FileConfig,
};
pub use error::BrandAlertError;
pub use models::{Domain, ErrorMessage, Response};
pub use options::{Mode, ResponseFormat, SearchOptions};
pub use payload::{build_payload, Payload, SearchParams};
pub use requester::{ApiRequester, DEFAULT_BASE_URL};

/// Parameter validators, usable on their own.
pub mod validation;

mod client;
mod config;
mod error;
mod models;
mod options;
mod payload;
mod requester;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, BrandAlertError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
