//! Batch recheck of the monitored domain inventory.
//!
//! Domains are processed in fixed-size groups, concurrently within a group
//! and with a pause between groups so the upstream services never see the
//! whole inventory at once. A domain whose resolution fails still gets its
//! check timestamp written so staleness is never hidden.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::error::CoreResult;
use crate::resolver::DomainResolver;
use crate::traits::DomainRepository;
use crate::types::{DomainRecord, DomainUpdate, RecheckSummary};

/// Rechecks every stored domain through the resolver.
pub struct BatchRunner {
    resolver: Arc<DomainResolver>,
    domain_repo: Arc<dyn DomainRepository>,
    batch_size: usize,
    batch_pause: Duration,
}

impl BatchRunner {
    #[must_use]
    pub fn new(
        resolver: Arc<DomainResolver>,
        domain_repo: Arc<dyn DomainRepository>,
        batch_size: usize,
        batch_pause_ms: u64,
    ) -> Self {
        Self {
            resolver,
            domain_repo,
            batch_size: batch_size.max(1),
            batch_pause: Duration::from_millis(batch_pause_ms),
        }
    }

    /// Rechecks the full inventory, returning per-domain success counts.
    ///
    /// Only storage-level failures abort the run; individual resolution
    /// failures are recorded on the domain row and counted.
    pub async fn recheck_all(&self) -> CoreResult<RecheckSummary> {
        let domains = self.domain_repo.find_all().await?;
        log::info!(
            "[batch] Rechecking {} domains in groups of {}",
            domains.len(),
            self.batch_size
        );

        let mut summary = RecheckSummary::default();
        let groups: Vec<&[DomainRecord]> = domains.chunks(self.batch_size).collect();
        let group_count = groups.len();

        for (index, group) in groups.into_iter().enumerate() {
            let results = join_all(group.iter().map(|d| self.recheck_one(d))).await;
            for ok in results {
                if ok {
                    summary.updated += 1;
                } else {
                    summary.failed += 1;
                }
            }

            if index + 1 < group_count && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
        }

        log::info!(
            "[batch] Recheck finished: {} updated, {} failed",
            summary.updated,
            summary.failed
        );
        Ok(summary)
    }

    /// Resolves one domain and writes the outcome back. Returns whether the
    /// recheck produced usable data; write errors also count as failures.
    async fn recheck_one(&self, record: &DomainRecord) -> bool {
        let now = Utc::now();
        let update = match self.resolver.resolve(&record.name).await {
            Ok(info) => DomainUpdate::from_resolution(&info, now),
            Err(e) => {
                log::warn!("[batch] Recheck of {} failed: {e}", record.name);
                DomainUpdate::check_failed(now)
            }
        };
        let resolved = update.status != Some(crate::types::DomainStatus::Failed);

        if let Err(e) = self.domain_repo.update(&record.id, &update).await {
            log::error!("[batch] Failed to store recheck of {}: {e}", record.name);
            return false;
        }
        resolved
    }
}
