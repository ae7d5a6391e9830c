//! Task bodies and their wiring into the scheduler.
//!
//! Five fixed tasks (expiry reminders, daily/weekly summaries, delivery
//! retry, full recheck) plus one dynamic task per active notification rule.
//! Rule tasks are kept in sync by the platform calling [`sync_rule`] /
//! [`remove_rule`] on every rule mutation and [`restore_rules`] at startup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::batch::BatchRunner;
use crate::config::ScheduleConfig;
use crate::error::{CoreError, CoreResult};
use crate::scheduler::{ScheduledJob, Scheduler};
use crate::traits::{DomainRepository, Notifier, RuleRepository};
use crate::types::{
    DomainRecord, DomainStatus, NotificationRule, NotifyOutcome, RuleType, SummaryPeriod,
};

/// Task IDs of the fixed schedule.
pub const TASK_EXPIRY_REMINDER: &str = "expiry-reminder";
pub const TASK_SUMMARY_DAILY: &str = "summary-daily";
pub const TASK_SUMMARY_WEEKLY: &str = "summary-weekly";
pub const TASK_DELIVERY_RETRY: &str = "delivery-retry";
pub const TASK_FULL_RECHECK: &str = "full-recheck";

/// Shared collaborators handed to every task body.
#[derive(Clone)]
pub struct JobContext {
    pub domain_repo: Arc<dyn DomainRepository>,
    pub rule_repo: Arc<dyn RuleRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub batch: Arc<BatchRunner>,
}

/// Task ID for one rule's dynamic task.
#[must_use]
pub fn rule_task_id(rule_id: &str) -> String {
    format!("rule-{rule_id}")
}

fn describe_outcome(outcome: NotifyOutcome) -> String {
    format!("{} sent, {} failed", outcome.sent, outcome.failed)
}

/// Domains that warrant an expiry alert.
fn needs_alert(record: &DomainRecord) -> bool {
    matches!(
        record.status,
        DomainStatus::Expiring | DomainStatus::Expired | DomainStatus::Unregistered
    )
}

struct ExpiryReminderJob {
    domain_repo: Arc<dyn DomainRepository>,
    notifier: Arc<dyn Notifier>,
}

#[async_trait]
impl ScheduledJob for ExpiryReminderJob {
    async fn run(&self) -> CoreResult<String> {
        let domains = self.domain_repo.find_all().await?;
        let flagged: Vec<DomainRecord> = domains.into_iter().filter(needs_alert).collect();
        if flagged.is_empty() {
            return Ok("no domains need alerts".to_string());
        }
        let outcome = self.notifier.send_expiry_alerts(&flagged).await?;
        Ok(describe_outcome(outcome))
    }
}

struct SummaryJob {
    domain_repo: Arc<dyn DomainRepository>,
    notifier: Arc<dyn Notifier>,
    period: SummaryPeriod,
}

#[async_trait]
impl ScheduledJob for SummaryJob {
    async fn run(&self) -> CoreResult<String> {
        let domains = self.domain_repo.find_all().await?;
        let outcome = self.notifier.send_summary(self.period, &domains).await?;
        Ok(describe_outcome(outcome))
    }
}

struct DeliveryRetryJob {
    notifier: Arc<dyn Notifier>,
}

#[async_trait]
impl ScheduledJob for DeliveryRetryJob {
    async fn run(&self) -> CoreResult<String> {
        let outcome = self.notifier.retry_failed().await?;
        Ok(describe_outcome(outcome))
    }
}

struct FullRecheckJob {
    batch: Arc<BatchRunner>,
}

#[async_trait]
impl ScheduledJob for FullRecheckJob {
    async fn run(&self) -> CoreResult<String> {
        let summary = self.batch.recheck_all().await?;
        Ok(format!(
            "{} of {} domains updated",
            summary.updated,
            summary.total()
        ))
    }
}

struct RuleNotificationJob {
    rule: NotificationRule,
    domain_repo: Arc<dyn DomainRepository>,
    notifier: Arc<dyn Notifier>,
}

#[async_trait]
impl ScheduledJob for RuleNotificationJob {
    async fn run(&self) -> CoreResult<String> {
        let domains = self.domain_repo.find_all().await?;
        let selected: Vec<DomainRecord> = match self.rule.rule_type {
            RuleType::Expiry => domains.into_iter().filter(needs_alert).collect(),
            RuleType::Summary => domains,
        };
        if selected.is_empty() && self.rule.rule_type == RuleType::Expiry {
            return Ok("no domains matched rule".to_string());
        }
        let outcome = self
            .notifier
            .send_rule_notification(&self.rule, &selected)
            .await?;
        Ok(describe_outcome(outcome))
    }
}

/// Registers the five fixed tasks with their configured schedules.
pub async fn install_fixed_jobs(
    scheduler: &Scheduler,
    ctx: &JobContext,
    schedules: &ScheduleConfig,
) -> CoreResult<()> {
    scheduler
        .register(
            TASK_EXPIRY_REMINDER,
            &schedules.expiry_reminder_cron,
            Arc::new(ExpiryReminderJob {
                domain_repo: Arc::clone(&ctx.domain_repo),
                notifier: Arc::clone(&ctx.notifier),
            }),
        )
        .await?;
    scheduler
        .register(
            TASK_SUMMARY_DAILY,
            &schedules.daily_summary_cron,
            Arc::new(SummaryJob {
                domain_repo: Arc::clone(&ctx.domain_repo),
                notifier: Arc::clone(&ctx.notifier),
                period: SummaryPeriod::Daily,
            }),
        )
        .await?;
    scheduler
        .register(
            TASK_SUMMARY_WEEKLY,
            &schedules.weekly_summary_cron,
            Arc::new(SummaryJob {
                domain_repo: Arc::clone(&ctx.domain_repo),
                notifier: Arc::clone(&ctx.notifier),
                period: SummaryPeriod::Weekly,
            }),
        )
        .await?;
    scheduler
        .register(
            TASK_DELIVERY_RETRY,
            &schedules.retry_failed_cron,
            Arc::new(DeliveryRetryJob {
                notifier: Arc::clone(&ctx.notifier),
            }),
        )
        .await?;
    scheduler
        .register(
            TASK_FULL_RECHECK,
            &schedules.full_recheck_cron,
            Arc::new(FullRecheckJob {
                batch: Arc::clone(&ctx.batch),
            }),
        )
        .await?;
    Ok(())
}

/// Brings one rule's scheduled task in line with the rule's current state.
///
/// Active rules get their task registered (replacing any previous version);
/// inactive rules get it stopped. An invalid cron expression propagates and
/// leaves a previously registered task unchanged.
pub async fn sync_rule(
    scheduler: &Scheduler,
    ctx: &JobContext,
    rule: &NotificationRule,
) -> CoreResult<()> {
    let task_id = rule_task_id(&rule.id);
    if rule.is_active {
        scheduler
            .register(
                &task_id,
                &rule.cron_expression,
                Arc::new(RuleNotificationJob {
                    rule: rule.clone(),
                    domain_repo: Arc::clone(&ctx.domain_repo),
                    notifier: Arc::clone(&ctx.notifier),
                }),
            )
            .await
    } else {
        remove_rule(scheduler, &rule.id).await
    }
}

/// Stops a rule's scheduled task. Idempotent: a rule with no task is fine.
pub async fn remove_rule(scheduler: &Scheduler, rule_id: &str) -> CoreResult<()> {
    match scheduler.stop(&rule_task_id(rule_id)).await {
        Ok(()) | Err(CoreError::TaskNotFound(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Re-registers tasks for every active rule, called once at startup.
///
/// A rule with a broken cron expression is logged and skipped so one bad
/// rule never blocks the rest. Returns how many rules were restored.
pub async fn restore_rules(scheduler: &Scheduler, ctx: &JobContext) -> CoreResult<usize> {
    let rules = ctx.rule_repo.find_active().await?;
    let mut restored = 0;
    for rule in &rules {
        match sync_rule(scheduler, ctx, rule).await {
            Ok(()) => restored += 1,
            Err(e) => {
                log::warn!("[jobs] Skipping rule {} at startup: {e}", rule.id);
            }
        }
    }
    log::info!("[jobs] Restored {restored} of {} active rules", rules.len());
    Ok(restored)
}
