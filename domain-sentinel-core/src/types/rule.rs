//! Notification rule types, consumed to drive dynamic task registration.

use serde::{Deserialize, Serialize};

/// What a rule notifies about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Alert on domains that are expiring or expired.
    Expiry,
    /// Periodic inventory summary.
    Summary,
}

/// A user-defined notification rule from the rule store.
///
/// The engine consumes only the identity, schedule and activation state;
/// recipients and template are passed through to the notification
/// collaborator untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRule {
    /// Rule ID; doubles as the scheduled-task ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Cron schedule (5-field crontab or 6-field with seconds).
    #[serde(rename = "cronExpression")]
    pub cron_expression: String,
    /// Inactive rules have no scheduled task.
    #[serde(rename = "isActive")]
    pub is_active: bool,
    /// What the rule notifies about.
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Delivery targets, passed through to the notifier.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Message template, passed through to the notifier.
    #[serde(rename = "templateId")]
    pub template_id: Option<String>,
}
