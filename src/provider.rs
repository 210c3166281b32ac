//! Signing provider seam
//!
//! The wallet itself (key custody, signing UI, session persistence) lives in
//! an external provider. The client core only depends on this contract, so
//! tests substitute a mock and production wires in a real wallet bridge.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An authorized, signing-capable handle to a chain account.
/// Either fully valid (actor + permission) or absent; never partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub actor: String,
    pub permission: String,
}

impl Session {
    pub fn permission_level(&self) -> PermissionLevel {
        PermissionLevel {
            actor: self.actor.clone(),
            permission: self.permission.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

/// Payload of a token `transfer` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferData {
    pub from: String,
    pub to: String,
    pub quantity: String,
    pub memo: String,
}

/// A single on-chain action, bit-exact as submitted for signing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub account: String,
    pub name: String,
    pub authorization: Vec<PermissionLevel>,
    pub data: TransferData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactReceipt {
    pub transaction_id: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The chain or wallet rejected the transaction; message verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Capability-based interface to the external wallet
#[async_trait]
pub trait SigningProvider: Send + Sync {
    /// Reconstitute a previously authorized session from the provider's own
    /// persisted state. `Ok(None)` means no prior session.
    async fn restore(&self) -> Result<Option<Session>, ProviderError>;

    /// Present the provider's connect UI. `Ok(None)` means the user
    /// cancelled.
    async fn login(&self) -> Result<Option<Session>, ProviderError>;

    /// Invalidate any persisted session on the provider side.
    async fn logout(&self) -> Result<(), ProviderError>;

    /// Sign and broadcast the given actions under the session's authority.
    async fn transact(
        &self,
        session: &Session,
        actions: Vec<Action>,
    ) -> Result<TransactReceipt, ProviderError>;
}
