//! Test doubles for the collaborator traits.
//!
//! In-memory mock implementations plus a scripted lookup provider, used by
//! this crate's tests and available to platform integrations testing against
//! the engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;

use domain_sentinel_provider::{
    LookupError, LookupProvider, ProviderId, RawQueryResult, Result as LookupResult,
};

use crate::error::CoreResult;
use crate::traits::{DomainRepository, Notifier, RuleRepository};
use crate::types::{
    DomainRecord, DomainStatus, DomainUpdate, NotificationRule, NotifyOutcome, SummaryPeriod,
};

// ===== MockLookupProvider =====

type Responder = Box<dyn Fn(&str) -> LookupResult<RawQueryResult> + Send + Sync>;

/// Scripted lookup provider with a call log.
pub struct MockLookupProvider {
    id: ProviderId,
    enabled: bool,
    min_delay: std::time::Duration,
    response: Option<LookupResult<RawQueryResult>>,
    responder: Option<Responder>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockLookupProvider {
    #[must_use]
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            enabled: true,
            min_delay: std::time::Duration::ZERO,
            response: None,
            responder: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fixed response returned for every query.
    #[must_use]
    pub fn with_response(mut self, response: LookupResult<RawQueryResult>) -> Self {
        self.response = Some(response);
        self
    }

    /// Per-domain response function; takes precedence over the fixed response.
    #[must_use]
    pub fn with_responder(
        mut self,
        f: impl Fn(&str) -> LookupResult<RawQueryResult> + Send + Sync + 'static,
    ) -> Self {
        self.responder = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Minimum inter-request delay reported to the orchestrator.
    #[must_use]
    pub fn with_min_delay(mut self, delay: std::time::Duration) -> Self {
        self.min_delay = delay;
        self
    }

    /// Shared handle to the list of queried domains, in call order.
    #[must_use]
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LookupProvider for MockLookupProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn min_delay(&self) -> std::time::Duration {
        self.min_delay
    }

    async fn query(&self, domain: &str) -> LookupResult<RawQueryResult> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(domain.to_string());
        if let Some(responder) = &self.responder {
            return responder(domain);
        }
        match &self.response {
            Some(response) => response.clone(),
            None => Err(LookupError::Unavailable {
                provider: self.id.as_str().to_string(),
                reason: "no scripted response".to_string(),
            }),
        }
    }
}

// ===== MockDomainRepository =====

pub struct MockDomainRepository {
    rows: RwLock<HashMap<String, DomainRecord>>,
}

impl MockDomainRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a bare row with no resolution data yet.
    pub async fn insert_named(&self, id: &str, name: &str) {
        self.insert_with_status(id, name, DomainStatus::Normal).await;
    }

    pub async fn insert_with_status(&self, id: &str, name: &str, status: DomainStatus) {
        let record = DomainRecord {
            id: id.to_string(),
            name: name.to_string(),
            registrar: None,
            expires_at: None,
            dns_provider: None,
            status_text: None,
            status,
            last_check: None,
        };
        self.rows.write().await.insert(id.to_string(), record);
    }

    pub async fn set_registrar(&self, id: &str, registrar: &str) {
        if let Some(record) = self.rows.write().await.get_mut(id) {
            record.registrar = Some(registrar.to_string());
        }
    }
}

impl Default for MockDomainRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainRepository for MockDomainRepository {
    async fn find_all(&self) -> CoreResult<Vec<DomainRecord>> {
        let mut rows: Vec<DomainRecord> = self.rows.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<DomainRecord>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn update(&self, id: &str, update: &DomainUpdate) -> CoreResult<()> {
        let mut rows = self.rows.write().await;
        let Some(record) = rows.get_mut(id) else {
            return Err(crate::error::CoreError::DomainNotFound(id.to_string()));
        };
        if update.registrar.is_some() {
            record.registrar.clone_from(&update.registrar);
        }
        if update.expires_at.is_some() {
            record.expires_at = update.expires_at;
        }
        if update.dns_provider.is_some() {
            record.dns_provider.clone_from(&update.dns_provider);
        }
        if update.status_text.is_some() {
            record.status_text.clone_from(&update.status_text);
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        record.last_check = Some(update.last_check);
        Ok(())
    }
}

// ===== MockRuleRepository =====

pub struct MockRuleRepository {
    rules: RwLock<HashMap<String, NotificationRule>>,
}

impl MockRuleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, rule: NotificationRule) {
        self.rules.write().await.insert(rule.id.clone(), rule);
    }
}

impl Default for MockRuleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleRepository for MockRuleRepository {
    async fn find_all(&self) -> CoreResult<Vec<NotificationRule>> {
        Ok(self.rules.read().await.values().cloned().collect())
    }

    async fn find_active(&self) -> CoreResult<Vec<NotificationRule>> {
        Ok(self
            .rules
            .read()
            .await
            .values()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }
}

// ===== MockNotifier =====

/// Recording notifier: every delivery succeeds and is logged for assertions.
pub struct MockNotifier {
    expiry_alerts: Mutex<Vec<Vec<String>>>,
    summaries: Mutex<Vec<(SummaryPeriod, usize)>>,
    rule_notifications: Mutex<Vec<(String, usize)>>,
    retry_invocations: Mutex<usize>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            expiry_alerts: Mutex::new(Vec::new()),
            summaries: Mutex::new(Vec::new()),
            rule_notifications: Mutex::new(Vec::new()),
            retry_invocations: Mutex::new(0),
        }
    }

    /// Domain-name batches handed to `send_expiry_alerts`, in call order.
    #[must_use]
    pub fn expiry_alert_calls(&self) -> Vec<Vec<String>> {
        self.expiry_alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn summary_calls(&self) -> Vec<(SummaryPeriod, usize)> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(rule id, domain count)` pairs handed to `send_rule_notification`.
    #[must_use]
    pub fn rule_notification_calls(&self) -> Vec<(String, usize)> {
        self.rule_notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn retry_invocations(&self) -> usize {
        *self
            .retry_invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_expiry_alerts(&self, domains: &[DomainRecord]) -> CoreResult<NotifyOutcome> {
        self.expiry_alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(domains.iter().map(|d| d.name.clone()).collect());
        Ok(NotifyOutcome {
            sent: domains.len(),
            failed: 0,
        })
    }

    async fn send_summary(
        &self,
        period: SummaryPeriod,
        domains: &[DomainRecord],
    ) -> CoreResult<NotifyOutcome> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((period, domains.len()));
        Ok(NotifyOutcome { sent: 1, failed: 0 })
    }

    async fn send_rule_notification(
        &self,
        rule: &NotificationRule,
        domains: &[DomainRecord],
    ) -> CoreResult<NotifyOutcome> {
        self.rule_notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((rule.id.clone(), domains.len()));
        Ok(NotifyOutcome {
            sent: rule.recipients.len().max(1),
            failed: 0,
        })
    }

    async fn retry_failed(&self) -> CoreResult<NotifyOutcome> {
        *self
            .retry_invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(NotifyOutcome::default())
    }
}
