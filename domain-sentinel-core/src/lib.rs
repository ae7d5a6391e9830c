//! Domain Sentinel Core Library
//!
//! Platform-independent engine for domain registration monitoring:
//! - WHOIS/RDAP-style response parsing and expiry classification (parser)
//! - Provider-fallback query orchestration (resolver)
//! - Paced batch recheck of the monitored inventory (batch)
//! - Dynamic cron task scheduling and the fixed task set (scheduler, jobs)
//!
//! Storage, rule CRUD and notification delivery are abstracted behind traits;
//! the embedding platform wires its own implementations in.

pub mod batch;
pub mod config;
pub mod error;
pub mod jobs;
pub mod parser;
pub mod resolver;
pub mod scheduler;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use batch::BatchRunner;
pub use config::{ResolverConfig, ScheduleConfig, SentinelConfig};
pub use error::{CoreError, CoreResult, LookupError};
pub use jobs::JobContext;
pub use parser::resolve_payload;
pub use resolver::DomainResolver;
pub use scheduler::{ScheduledJob, Scheduler, TaskStatus};
pub use traits::{DomainRepository, Notifier, RuleRepository};
pub use types::{
    DomainRecord, DomainStatus, DomainUpdate, NotificationRule, NotifyOutcome, RecheckSummary,
    ResolvedDomainInfo, RuleType, SummaryPeriod,
};
