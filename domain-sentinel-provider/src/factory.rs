//! Provider factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::http_client::create_http_client;
use crate::providers::{WhoApiProvider, WhoisJsonProvider, WhoisProvider};
use crate::traits::LookupProvider;
use crate::types::ProviderSettings;

/// Builds all lookup providers from configuration.
///
/// The returned vector always contains every declared provider in
/// [`ProviderId::ALL`](crate::ProviderId::ALL) order — disabled providers are
/// included (reporting `is_enabled() == false`) so the caller's strategy list
/// stays deterministic and auditable. Configuration is read once here and
/// never mutated afterwards.
pub fn build_providers(settings: &ProviderSettings) -> Result<Vec<Arc<dyn LookupProvider>>> {
    let client = create_http_client()?;

    Ok(vec![
        Arc::new(WhoisProvider::new(&settings.whois)?),
        Arc::new(WhoisJsonProvider::new(client.clone(), &settings.whoisjson)),
        Arc::new(WhoApiProvider::new(client, &settings.whoapi)),
    ])
}
