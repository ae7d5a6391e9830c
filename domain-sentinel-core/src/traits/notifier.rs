//! Notification collaborator abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{DomainRecord, NotificationRule, NotifyOutcome, SummaryPeriod};

/// Outbound notification delivery.
///
/// The engine hands over batches of resolved/stale domains and receives
/// typed counts back; delivery mechanics (email, templates, queues) are the
/// implementor's concern. Failed deliveries are expected to be queued so the
/// hourly [`retry_failed`](Notifier::retry_failed) sweep can pick them up.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Alerts for domains that are expiring, expired or unregistered.
    async fn send_expiry_alerts(&self, domains: &[DomainRecord]) -> CoreResult<NotifyOutcome>;

    /// Periodic inventory summary.
    async fn send_summary(
        &self,
        period: SummaryPeriod,
        domains: &[DomainRecord],
    ) -> CoreResult<NotifyOutcome>;

    /// Delivery for one user-defined rule, with its recipients/template.
    async fn send_rule_notification(
        &self,
        rule: &NotificationRule,
        domains: &[DomainRecord],
    ) -> CoreResult<NotifyOutcome>;

    /// Retries previously failed deliveries.
    async fn retry_failed(&self) -> CoreResult<NotifyOutcome>;
}
