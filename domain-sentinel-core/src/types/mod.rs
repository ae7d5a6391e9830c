//! Core type definitions.

mod domain;
mod report;
mod rule;

pub use domain::{DomainRecord, DomainStatus, DomainUpdate, ResolvedDomainInfo};
pub use report::{NotifyOutcome, RecheckSummary, SummaryPeriod};
pub use rule::{NotificationRule, RuleType};
