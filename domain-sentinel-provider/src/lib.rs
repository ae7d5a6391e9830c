//! # domain-sentinel-provider
//!
//! Registration-data lookup sources for Domain Sentinel, behind one uniform
//! contract.
//!
//! ## Supported Providers
//!
//! | Provider | Identifier | Auth |
//! |----------|------------|------|
//! | Port-43 WHOIS | `whois` | none |
//! | [WhoisJSON](https://whoisjson.com/) | `whoisjson` | API token |
//! | [WhoAPI](https://whoapi.com/) | `whoapi` | API key |
//!
//! The WHOIS client answers with raw multi-line text; the HTTP services
//! return pre-parsed JSON fields. Both payload shapes travel as
//! [`RawQueryResult`] so the caller applies one parsing/classification path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use domain_sentinel_provider::{build_providers, ProviderSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let providers = build_providers(&ProviderSettings::default())?;
//!     for provider in &providers {
//!         if !provider.is_enabled() {
//!             continue;
//!         }
//!         let result = provider.query("example.com").await?;
//!         println!("{}: {:?}", result.source, result.payload);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, LookupError>`](LookupError). Transient
//! errors (`NetworkError`, `Timeout`, `RateLimited`) are retried internally
//! with exponential backoff; everything else surfaces immediately for the
//! caller's fallback chain.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod util;

// Re-export error types
pub use error::{LookupError, Result};

// Re-export factory functions
pub use factory::build_providers;

// Re-export the provider contract
pub use traits::LookupProvider;

// Re-export types
pub use types::{
    HttpServiceSettings, ProviderId, ProviderSettings, RawPayload, RawQueryResult, WhoisFields,
    WhoisSettings,
};

// Re-export concrete providers
pub use providers::{WhoApiProvider, WhoisJsonProvider, WhoisProvider};
