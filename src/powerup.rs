//! PowerUp transfer composition and submission
//!
//! Validates a [`PowerUpRequest`], encodes the CPU/NET split into the
//! transfer memo consumed by the service contract, and submits the single
//! transfer action through the active wallet session.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ChainConfig;
use crate::error::{Error, Result};
use crate::estimate::EstimateTracker;
use crate::provider::{Action, Session, TransferData};
use crate::session::WalletManager;
use crate::types::{format_quantity, is_valid_account, PowerUpReceipt, PowerUpRequest};

/// Encode the CPU/NET split for the receiving contract. The percentages
/// always sum to exactly 100 regardless of rounding.
pub fn encode_memo(cpu_amount: f64, net_amount: f64, recipient: &str) -> String {
    if cpu_amount > 0.0 && net_amount > 0.0 {
        let total = cpu_amount + net_amount;
        let cpu_percent = ((cpu_amount / total) * 100.0).round() as i64;
        let net_percent = 100 - cpu_percent;
        format!("cpu:{cpu_percent},net:{net_percent}:{recipient}")
    } else if net_amount > 0.0 {
        format!("net:{recipient}")
    } else {
        recipient.to_string()
    }
}

/// Classify a submission failure. Messages mentioning CPU, billing, or
/// deadlines indicate the signer lacked network resources, which the user
/// can remediate (e.g. a fee sponsor); everything else is surfaced verbatim.
pub fn classify_submit_error(message: &str) -> Error {
    let lower = message.to_lowercase();
    if lower.contains("cpu") || lower.contains("billed") || lower.contains("deadline") {
        Error::InsufficientResources(message.to_string())
    } else {
        Error::Submission(message.to_string())
    }
}

/// Validate a request against the session and balance, and build the exact
/// transfer action to be signed. Validation short-circuits on the first
/// failure: positive total, total within balance, recipient grammar.
/// Returns the action together with the resolved recipient.
pub fn compose_action(
    config: &ChainConfig,
    session: &Session,
    request: &PowerUpRequest,
    balance: f64,
) -> Result<(Action, String)> {
    let total = request.total();
    if total <= 0.0 {
        return Err(Error::InvalidAmount);
    }
    if total > balance {
        return Err(Error::InsufficientBalance {
            required: total,
            available: balance,
        });
    }

    let recipient = request
        .recipient
        .as_deref()
        .filter(|r| !r.is_empty())
        .unwrap_or(&session.actor)
        .to_string();
    if !is_valid_account(&recipient) {
        return Err(Error::InvalidRecipient(recipient));
    }

    let action = Action {
        account: config.token_contract.clone(),
        name: "transfer".to_string(),
        authorization: vec![session.permission_level()],
        data: TransferData {
            from: session.actor.clone(),
            to: config.service_account.clone(),
            quantity: format_quantity(total, &config.token_symbol),
            memo: encode_memo(request.cpu_amount, request.net_amount, &recipient),
        },
    };

    Ok((action, recipient))
}

/// Composes and submits PowerUp transfers through the wallet manager,
/// refreshing the cached balance and stats after each confirmed submission.
pub struct PowerUpService {
    config: ChainConfig,
    manager: Arc<WalletManager>,
    estimates: Arc<EstimateTracker>,
}

impl PowerUpService {
    pub fn new(
        config: ChainConfig,
        manager: Arc<WalletManager>,
        estimates: Arc<EstimateTracker>,
    ) -> Self {
        Self {
            config,
            manager,
            estimates,
        }
    }

    /// Validate, compose, and submit a PowerUp. `Error::NotConnected` means
    /// the caller should route the user through the connect flow first.
    pub async fn power_up(&self, request: &PowerUpRequest) -> Result<PowerUpReceipt> {
        let session = self.manager.session().await.ok_or(Error::NotConnected)?;
        let balance = self.manager.balance().await;

        let (action, recipient) = compose_action(&self.config, &session, request, balance)?;
        let total = request.total();

        let receipt = self
            .manager
            .provider()
            .transact(&session, vec![action])
            .await
            .map_err(|err| classify_submit_error(&err.to_string()))?;

        info!(
            transaction_id = %receipt.transaction_id,
            %recipient,
            total,
            "powerup submitted"
        );

        // The submitted transfer invalidates both caches.
        self.manager.refresh_balance().await;
        if let Err(err) = self.manager.reader().refresh_stats().await {
            warn!("stats refresh after powerup failed: {err}");
        }

        let estimate = self.estimates.current().await;
        let (cpu_ms, net_bytes) = estimate
            .map(|e| (e.cpu_ms, e.net_bytes))
            .unwrap_or((0.0, 0.0));

        Ok(PowerUpReceipt {
            cpu_ms,
            net_bytes,
            total_spent: total,
            recipient,
        })
    }
}
