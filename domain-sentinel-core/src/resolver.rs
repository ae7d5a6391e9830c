//! Provider-fallback query orchestration.
//!
//! One resolution walks an ordered provider chain until a provider answers,
//! parsing and classifying the first successful payload. Provider order is
//! deterministic per domain: registries known to answer port-43 WHOIS poorly
//! get the HTTP services tried first.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::Utc;
use regex::Regex;

use domain_sentinel_provider::{LookupProvider, ProviderId};

use crate::config::ResolverConfig;
use crate::error::{CoreError, CoreResult};
use crate::parser::resolve_payload;
use crate::types::ResolvedDomainInfo;

/// RFC 1035-shaped domain validation: lowercase labels of 1-63 chars,
/// hyphens only in the interior, at least one dot.
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
        .unwrap_or_else(|e| unreachable!("{e}"))
});

/// Resolves domains through an ordered chain of lookup providers.
pub struct DomainResolver {
    providers: Vec<Arc<dyn LookupProvider>>,
    config: ResolverConfig,
}

impl DomainResolver {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn LookupProvider>>, config: ResolverConfig) -> Self {
        Self { providers, config }
    }

    /// Normalizes and validates a user-supplied domain name.
    ///
    /// Trims whitespace and a single trailing dot, lowercases, then shape-
    /// checks. Validation happens before any provider is consulted.
    pub fn normalize_domain(&self, input: &str) -> CoreResult<String> {
        let domain = input.trim().trim_end_matches('.').to_lowercase();
        if DOMAIN.is_match(&domain) {
            Ok(domain)
        } else {
            Err(CoreError::InvalidDomain(input.trim().to_string()))
        }
    }

    /// Provider order for one domain.
    ///
    /// Domains under a problem TLD lead with the HTTP services; everything
    /// else leads with plain WHOIS. Pure function of domain and config.
    #[must_use]
    pub fn compute_strategy(&self, domain: &str) -> [ProviderId; 3] {
        if self.is_problem_tld(domain) {
            [ProviderId::WhoisJson, ProviderId::WhoApi, ProviderId::Whois]
        } else {
            [ProviderId::Whois, ProviderId::WhoisJson, ProviderId::WhoApi]
        }
    }

    fn is_problem_tld(&self, domain: &str) -> bool {
        self.config
            .problem_tlds
            .iter()
            .any(|tld| domain.ends_with(&format!(".{tld}")))
    }

    /// Resolves one domain through the provider chain.
    ///
    /// Disabled providers are skipped. A provider failure falls through to
    /// the next provider (after that provider's minimum delay) unless
    /// fallback is disabled, in which case it propagates immediately. When
    /// every provider failed or was skipped the aggregate error lists what
    /// went wrong per provider.
    pub async fn resolve(&self, input: &str) -> CoreResult<ResolvedDomainInfo> {
        let domain = self.normalize_domain(input)?;
        let strategy = self.compute_strategy(&domain);
        log::debug!("[resolver] Strategy for {domain}: {strategy:?}");

        let mut failures: Vec<String> = Vec::new();

        for (position, id) in strategy.iter().enumerate() {
            let Some(provider) = self.providers.iter().find(|p| p.id() == *id) else {
                continue;
            };
            if !provider.is_enabled() {
                log::debug!("[resolver] Skipping disabled provider {id}");
                continue;
            }

            match provider.query(&domain).await {
                Ok(result) => {
                    let info = resolve_payload(&domain, &result, Utc::now());
                    log::info!(
                        "[resolver] Resolved {domain} via {id} as {}",
                        info.status.as_str()
                    );
                    return Ok(info);
                }
                Err(e) => {
                    if e.is_expected() {
                        log::info!("[resolver] Provider {id} failed for {domain}: {e}");
                    } else {
                        log::warn!("[resolver] Provider {id} failed for {domain}: {e}");
                    }
                    failures.push(format!("{id}: {e}"));
                    if !self.config.allow_fallback {
                        return Err(e.into());
                    }
                    // Pace the next attempt only when the chain continues.
                    let last = position == strategy.len() - 1;
                    let delay = provider.min_delay();
                    if !last && delay > Duration::ZERO {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let detail = if failures.is_empty() {
            format!("no enabled provider could answer for {domain}")
        } else {
            failures.join("; ")
        };
        Err(CoreError::AllProvidersExhausted(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockLookupProvider;
    use domain_sentinel_provider::{LookupError, RawPayload, RawQueryResult};

    fn config() -> ResolverConfig {
        ResolverConfig::default()
    }

    fn resolver(providers: Vec<Arc<dyn LookupProvider>>) -> DomainResolver {
        DomainResolver::new(providers, config())
    }

    fn ok_result(id: ProviderId) -> RawQueryResult {
        RawQueryResult {
            source: id,
            payload: RawPayload::Text(
                "Registrar: Test Inc.\nRegistry Expiry Date: 2099-01-01T00:00:00Z".to_string(),
            ),
        }
    }

    fn network_err(id: ProviderId) -> LookupError {
        LookupError::NetworkError {
            provider: id.as_str().to_string(),
            detail: "connection refused".to_string(),
        }
    }

    // ==================== normalize_domain ====================

    #[test]
    fn normalization() {
        let r = resolver(vec![]);
        assert_eq!(r.normalize_domain("  Example.COM. ").unwrap(), "example.com");
        assert_eq!(r.normalize_domain("sub.example.co.uk").unwrap(), "sub.example.co.uk");
    }

    #[test]
    fn invalid_domains_rejected() {
        let r = resolver(vec![]);
        for bad in ["", "nodots", "-leading.com", "trailing-.com", "spa ce.com", "a..b"] {
            assert!(
                matches!(r.normalize_domain(bad), Err(CoreError::InvalidDomain(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    // ==================== compute_strategy ====================

    #[test]
    fn default_strategy_leads_with_whois() {
        let r = resolver(vec![]);
        assert_eq!(
            r.compute_strategy("example.com"),
            [ProviderId::Whois, ProviderId::WhoisJson, ProviderId::WhoApi]
        );
    }

    #[test]
    fn problem_tld_leads_with_http_services() {
        let r = resolver(vec![]);
        assert_eq!(
            r.compute_strategy("example.cn"),
            [ProviderId::WhoisJson, ProviderId::WhoApi, ProviderId::Whois]
        );
        assert_eq!(
            r.compute_strategy("example.com.cn"),
            [ProviderId::WhoisJson, ProviderId::WhoApi, ProviderId::Whois]
        );
    }

    #[test]
    fn problem_tld_matches_whole_labels_only() {
        // "example.falcn" must not match the "cn" entry.
        let r = resolver(vec![]);
        assert_eq!(
            r.compute_strategy("example.falcn"),
            [ProviderId::Whois, ProviderId::WhoisJson, ProviderId::WhoApi]
        );
    }

    #[test]
    fn strategy_is_deterministic() {
        let r = resolver(vec![]);
        assert_eq!(r.compute_strategy("example.hk"), r.compute_strategy("example.hk"));
    }

    // ==================== resolve ====================

    #[tokio::test]
    async fn first_provider_success_short_circuits() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Ok(ok_result(ProviderId::Whois)));
        let second = MockLookupProvider::new(ProviderId::WhoisJson)
            .with_response(Err(network_err(ProviderId::WhoisJson)));
        let second_calls = second.calls();

        let r = resolver(vec![Arc::new(whois), Arc::new(second)]);
        let info = r.resolve("example.com").await.unwrap();
        assert_eq!(info.source, ProviderId::Whois);
        assert_eq!(info.registrar.as_deref(), Some("Test Inc."));
        assert!(second_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_falls_through_to_next_provider() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Err(network_err(ProviderId::Whois)));
        let whoisjson = MockLookupProvider::new(ProviderId::WhoisJson)
            .with_response(Ok(ok_result(ProviderId::WhoisJson)));
        let whoapi = MockLookupProvider::new(ProviderId::WhoApi)
            .with_response(Ok(ok_result(ProviderId::WhoApi)));
        let whoapi_calls = whoapi.calls();

        let r = resolver(vec![Arc::new(whois), Arc::new(whoisjson), Arc::new(whoapi)]);
        let info = r.resolve("example.com").await.unwrap();
        assert_eq!(info.source, ProviderId::WhoisJson);
        // Third provider never consulted once the second succeeded.
        assert!(whoapi_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fallback_disabled_propagates_first_failure() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Err(network_err(ProviderId::Whois)));
        let whoisjson = MockLookupProvider::new(ProviderId::WhoisJson)
            .with_response(Ok(ok_result(ProviderId::WhoisJson)));
        let whoisjson_calls = whoisjson.calls();

        let mut cfg = config();
        cfg.allow_fallback = false;
        let r = DomainResolver::new(vec![Arc::new(whois), Arc::new(whoisjson)], cfg);

        let err = r.resolve("example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::Lookup(_)));
        assert!(whoisjson_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn disabled_providers_skipped() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Ok(ok_result(ProviderId::Whois)))
            .disabled();
        let whoisjson = MockLookupProvider::new(ProviderId::WhoisJson)
            .with_response(Ok(ok_result(ProviderId::WhoisJson)));

        let r = resolver(vec![Arc::new(whois), Arc::new(whoisjson)]);
        let info = r.resolve("example.com").await.unwrap();
        assert_eq!(info.source, ProviderId::WhoisJson);
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_delay_applied_before_continuing_the_chain() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Err(network_err(ProviderId::Whois)))
            .with_min_delay(Duration::from_millis(750));
        let whoisjson = MockLookupProvider::new(ProviderId::WhoisJson)
            .with_response(Ok(ok_result(ProviderId::WhoisJson)));

        let r = resolver(vec![Arc::new(whois), Arc::new(whoisjson)]);
        let start = tokio::time::Instant::now();
        let info = r.resolve("example.com").await.unwrap();
        assert_eq!(info.source, ProviderId::WhoisJson);
        assert!(
            start.elapsed() >= Duration::from_millis(750),
            "failed provider's delay must elapse before the next attempt"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_pacing_delay_after_last_provider() {
        // WhoApi sits last in the default strategy; its failure ends the
        // chain, so its delay must not be slept.
        let whoapi = MockLookupProvider::new(ProviderId::WhoApi)
            .with_response(Err(network_err(ProviderId::WhoApi)))
            .with_min_delay(Duration::from_secs(5));

        let r = resolver(vec![Arc::new(whoapi)]);
        let start = tokio::time::Instant::now();
        let err = r.resolve("example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::AllProvidersExhausted(_)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn success_returns_without_pacing_delay() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Ok(ok_result(ProviderId::Whois)))
            .with_min_delay(Duration::from_secs(5));

        let r = resolver(vec![Arc::new(whois)]);
        let start = tokio::time::Instant::now();
        r.resolve("example.com").await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn all_failed_yields_exhausted_with_detail() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Err(network_err(ProviderId::Whois)));
        let whoisjson = MockLookupProvider::new(ProviderId::WhoisJson)
            .with_response(Err(LookupError::Timeout {
                provider: "whoisjson".to_string(),
                detail: "30s elapsed".to_string(),
            }));

        let r = resolver(vec![Arc::new(whois), Arc::new(whoisjson)]);
        let err = r.resolve("example.com").await.unwrap_err();
        match err {
            CoreError::AllProvidersExhausted(detail) => {
                assert!(detail.contains("whois:"));
                assert!(detail.contains("whoisjson:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_enabled_providers_yields_exhausted() {
        let r = resolver(vec![]);
        let err = r.resolve("example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::AllProvidersExhausted(_)));
    }

    #[tokio::test]
    async fn invalid_domain_fails_before_any_provider_call() {
        let whois = MockLookupProvider::new(ProviderId::Whois)
            .with_response(Ok(ok_result(ProviderId::Whois)));
        let calls = whois.calls();

        let r = resolver(vec![Arc::new(whois)]);
        let err = r.resolve("not a domain").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidDomain(_)));
        assert!(calls.lock().unwrap().is_empty());
    }
}
