use async_trait::async_trait;

use super::domain::{Listing, ListingDraft, UserId};

/// Persistence backend abstraction so the controller can be exercised in isolation.
#[async_trait]
pub trait ListingGateway: Send + Sync {
    /// Store a new listing, minting its identifier and backend timestamps.
    async fn create_listing(
        &self,
        draft: ListingDraft,
        acting_user: Option<&UserId>,
    ) -> Result<Listing, GatewayError>;

    /// Record an onboarding milestone for the user. Best effort.
    async fn mark_task_completed(&self, user_id: &UserId, task: &str) -> Result<(), GatewayError>;
}

/// Error enumeration for backend failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("listing backend unavailable: {0}")]
    Unavailable(String),
    #[error("listing backend rejected the request: {0}")]
    Rejected(String),
}
