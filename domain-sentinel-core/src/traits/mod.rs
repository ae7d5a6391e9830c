//! Collaborator abstraction trait definitions.

mod domain_repository;
mod notifier;
mod rule_repository;

pub use domain_repository::DomainRepository;
pub use notifier::Notifier;
pub use rule_repository::RuleRepository;
