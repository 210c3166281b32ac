//! Typed reads over the failover query client: token balances, service
//! contract statistics, and the global PowerUp pool state.

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{Error, Result};
use crate::query::{QueryClient, TableQuery};
use crate::types::{parse_asset, ContractStats, PowerUpState};

/// Weight ratio assumed when the pool row omits one
const DEFAULT_WEIGHT_RATIO: f64 = 1_000_000_000_000_000.0;

/// Reads on-chain state and caches the latest contract statistics.
/// All values are replaced wholesale on each successful fetch.
pub struct ChainReader {
    client: QueryClient,
    config: ChainConfig,
    stats: RwLock<Option<ContractStats>>,
}

impl ChainReader {
    pub fn new(client: QueryClient, config: ChainConfig) -> Self {
        Self {
            client,
            config,
            stats: RwLock::new(None),
        }
    }

    /// Fetch an account's spend-token balance. Zero rows means a zero
    /// balance; `Error::Unavailable` means every endpoint failed.
    pub async fn fetch_balance(&self, account: &str) -> Result<f64> {
        let query = TableQuery::new(&self.config.token_contract, account, "accounts");
        let rows = self
            .client
            .get_table_rows(&query)
            .await
            .ok_or(Error::Unavailable)?;

        let balance = rows
            .first()
            .and_then(|row| row.get("balance"))
            .and_then(Value::as_str)
            .map(parse_asset)
            .unwrap_or(0.0);

        debug!(account, balance, "fetched balance");
        Ok(balance)
    }

    /// Fetch the service contract's aggregate counters and replace the
    /// cached copy. Zero rows maps to explicit zero-valued stats.
    pub async fn refresh_stats(&self) -> Result<ContractStats> {
        let query = TableQuery::new(
            &self.config.service_account,
            &self.config.service_account,
            "stats",
        );
        let rows = self
            .client
            .get_table_rows(&query)
            .await
            .ok_or(Error::Unavailable)?;

        let stats = match rows.first() {
            Some(row) => ContractStats {
                total_powerups: row
                    .get("total_powerups")
                    .map(number_field)
                    .unwrap_or(0.0) as u64,
                wax_burnt: row
                    .get("total_wax_spent")
                    .and_then(Value::as_str)
                    .map(parse_asset)
                    .unwrap_or(0.0),
                cheese_nulled: row
                    .get("total_cheese_received")
                    .and_then(Value::as_str)
                    .map(parse_asset)
                    .unwrap_or(0.0),
            },
            None => ContractStats::default(),
        };

        *self.stats.write().await = Some(stats.clone());
        Ok(stats)
    }

    /// Latest successfully fetched stats, if any
    pub async fn cached_stats(&self) -> Option<ContractStats> {
        self.stats.read().await.clone()
    }

    /// Fetch the global PowerUp pool weights. `Ok(None)` when the table has
    /// no row; `Error::Unavailable` when every endpoint failed.
    pub async fn fetch_powerup_state(&self) -> Result<Option<PowerUpState>> {
        let query = TableQuery::new("eosio", "0", "powup.state");
        let rows = self
            .client
            .get_table_rows(&query)
            .await
            .ok_or(Error::Unavailable)?;

        Ok(rows.first().map(|row| PowerUpState {
            cpu_weight: nested_number(row, "cpu", "weight"),
            net_weight: nested_number(row, "net", "weight"),
            cpu_weight_ratio: nested_ratio(row, "cpu"),
            net_weight_ratio: nested_ratio(row, "net"),
        }))
    }
}

/// Chain tables serialize large numbers as either JSON numbers or strings
fn number_field(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn nested_number(row: &Value, outer: &str, inner: &str) -> f64 {
    row.get(outer)
        .and_then(|v| v.get(inner))
        .map(number_field)
        .unwrap_or(0.0)
}

fn nested_ratio(row: &Value, outer: &str) -> f64 {
    let ratio = nested_number(row, outer, "weight_ratio");
    if ratio > 0.0 {
        ratio
    } else {
        DEFAULT_WEIGHT_RATIO
    }
}
