//! Rule store collaborator abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::NotificationRule;

/// Notification rule repository.
///
/// Consumed only to drive dynamic task registration; rule CRUD lives with
/// the implementing platform, which calls back into the engine's rule sync
/// on every mutation.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// All rules, active or not.
    async fn find_all(&self) -> CoreResult<Vec<NotificationRule>>;

    /// Only currently active rules, used to rebuild schedules at startup.
    async fn find_active(&self) -> CoreResult<Vec<NotificationRule>>;
}
