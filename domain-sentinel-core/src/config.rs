//! Engine configuration surface.
//!
//! Read once at construction; the engine never mutates configuration at
//! runtime (external config ownership).

use serde::{Deserialize, Serialize};

pub use domain_sentinel_provider::{HttpServiceSettings, ProviderSettings, WhoisSettings};

/// Orchestrator and batch-runner tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// TLD suffixes whose registries answer port-43 WHOIS poorly; domains
    /// under these get the HTTP services prioritized ahead of WHOIS.
    #[serde(default = "default_problem_tlds")]
    pub problem_tlds: Vec<String>,
    /// When `false`, the first provider failure propagates immediately
    /// instead of falling through the chain.
    #[serde(default = "default_true")]
    pub allow_fallback: bool,
    /// Domains resolved concurrently within one batch group.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between batch groups, in milliseconds.
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            problem_tlds: default_problem_tlds(),
            allow_fallback: true,
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
        }
    }
}

fn default_problem_tlds() -> Vec<String> {
    ["cn", "com.cn", "net.cn", "org.cn", "hk", "tw"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_pause_ms() -> u64 {
    1000
}

/// Cron expressions for the fixed scheduled tasks.
///
/// Six-field expressions (with seconds); five-field crontab strings are also
/// accepted and normalized at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Daily expiry-reminder sweep.
    #[serde(default = "default_expiry_reminder_cron")]
    pub expiry_reminder_cron: String,
    /// Daily inventory summary.
    #[serde(default = "default_daily_summary_cron")]
    pub daily_summary_cron: String,
    /// Weekly inventory summary.
    #[serde(default = "default_weekly_summary_cron")]
    pub weekly_summary_cron: String,
    /// Hourly failed-delivery retry sweep.
    #[serde(default = "default_retry_failed_cron")]
    pub retry_failed_cron: String,
    /// Nightly full inventory recheck.
    #[serde(default = "default_full_recheck_cron")]
    pub full_recheck_cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            expiry_reminder_cron: default_expiry_reminder_cron(),
            daily_summary_cron: default_daily_summary_cron(),
            weekly_summary_cron: default_weekly_summary_cron(),
            retry_failed_cron: default_retry_failed_cron(),
            full_recheck_cron: default_full_recheck_cron(),
        }
    }
}

fn default_expiry_reminder_cron() -> String {
    "0 0 9 * * *".to_string()
}

fn default_daily_summary_cron() -> String {
    "0 30 9 * * *".to_string()
}

fn default_weekly_summary_cron() -> String {
    "0 0 10 * * Mon".to_string()
}

fn default_retry_failed_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_full_recheck_cron() -> String {
    "0 0 3 * * *".to_string()
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Lookup provider settings (enable flags, keys, delays).
    #[serde(default)]
    pub providers: ProviderSettings,
    /// Orchestrator/batch tuning.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Fixed task schedules.
    #[serde(default)]
    pub schedules: ScheduleConfig,
}
