//! Storage collaborator abstraction for monitored domains.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{DomainRecord, DomainUpdate};

/// Domain storage repository.
///
/// The engine only reads the inventory and writes partial updates after each
/// resolution; persistence mechanics (SQL, key-value, files) belong to the
/// implementing platform.
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Full monitored inventory.
    async fn find_all(&self) -> CoreResult<Vec<DomainRecord>>;

    /// Lookup by storage ID.
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>>;

    /// Lookup by normalized domain name.
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<DomainRecord>>;

    /// Applies a partial update to one domain row.
    ///
    /// `None` fields in the update are left untouched; `last_check` is
    /// always written.
    async fn update(&self, id: &str, update: &DomainUpdate) -> CoreResult<()>;
}
