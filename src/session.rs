//! Wallet session lifecycle
//!
//! Owns the single live [`Session`] for the process. Restore, login, and
//! logout are serialized through one mutex so callers can never observe a
//! half-updated session, and every failure path degrades to `Anonymous`
//! rather than surfacing an error or leaving the caller stuck loading.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::provider::{Session, SigningProvider};
use crate::reader::ChainReader;

/// `Restoring` is the initial state; the manager then moves between
/// `Active` and `Anonymous` for the rest of the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletState {
    Restoring,
    Anonymous,
    Active(Session),
}

pub struct WalletManager {
    provider: Arc<dyn SigningProvider>,
    reader: Arc<ChainReader>,
    /// Serializes restore/login/logout against each other
    ops: Mutex<()>,
    state: RwLock<WalletState>,
    balance: RwLock<f64>,
}

impl WalletManager {
    pub fn new(provider: Arc<dyn SigningProvider>, reader: Arc<ChainReader>) -> Self {
        Self {
            provider,
            reader,
            ops: Mutex::new(()),
            state: RwLock::new(WalletState::Restoring),
            balance: RwLock::new(0.0),
        }
    }

    /// Attempt to reconstitute a prior session at startup. Failure or
    /// absence is not an error; the manager simply becomes `Anonymous`.
    pub async fn restore(&self) {
        let _guard = self.ops.lock().await;

        match self.provider.restore().await {
            Ok(Some(session)) => {
                info!(actor = %session.actor, "restored wallet session");
                *self.state.write().await = WalletState::Active(session);
                drop(_guard);
                self.refresh_balance().await;
            }
            Ok(None) => {
                *self.state.write().await = WalletState::Anonymous;
            }
            Err(err) => {
                warn!("failed to restore session: {err}");
                *self.state.write().await = WalletState::Anonymous;
            }
        }
    }

    /// Open the provider's connect flow. Cancellation and provider failures
    /// are suppressed (logged only) so a closed connect dialog never leaves
    /// the caller in a stuck loading state. Returns the new session on
    /// success.
    pub async fn login(&self) -> Option<Session> {
        let _guard = self.ops.lock().await;

        match self.provider.login().await {
            Ok(Some(session)) => {
                info!(actor = %session.actor, "wallet connected");
                *self.state.write().await = WalletState::Active(session.clone());
                drop(_guard);
                self.refresh_balance().await;
                Some(session)
            }
            Ok(None) => {
                *self.state.write().await = WalletState::Anonymous;
                None
            }
            Err(err) => {
                warn!("wallet connect cancelled or failed: {err}");
                *self.state.write().await = WalletState::Anonymous;
                None
            }
        }
    }

    /// Invalidate the provider session and clear local state. Local state
    /// is cleared even when the provider call fails, so the caller's view
    /// stays consistent.
    pub async fn logout(&self) {
        let _guard = self.ops.lock().await;

        if let Err(err) = self.provider.logout().await {
            error!("failed to disconnect wallet: {err}");
        }
        *self.state.write().await = WalletState::Anonymous;
        *self.balance.write().await = 0.0;
    }

    /// Re-fetch the active account's balance and replace the cached value.
    /// No-op when no session is active; fetch failures keep the old value.
    pub async fn refresh_balance(&self) {
        let Some(account) = self.account().await else {
            return;
        };
        match self.reader.fetch_balance(&account).await {
            Ok(balance) => *self.balance.write().await = balance,
            Err(err) => warn!(%account, "balance refresh failed: {err}"),
        }
    }

    pub async fn state(&self) -> WalletState {
        self.state.read().await.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        match &*self.state.read().await {
            WalletState::Active(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub async fn account(&self) -> Option<String> {
        self.session().await.map(|session| session.actor)
    }

    pub async fn is_connected(&self) -> bool {
        matches!(&*self.state.read().await, WalletState::Active(_))
    }

    /// Cached spend-token balance for the active account
    pub async fn balance(&self) -> f64 {
        *self.balance.read().await
    }

    pub fn provider(&self) -> &Arc<dyn SigningProvider> {
        &self.provider
    }

    pub fn reader(&self) -> &Arc<ChainReader> {
        &self.reader
    }
}
