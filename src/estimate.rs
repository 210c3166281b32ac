//! Resource estimation
//!
//! Converts a proposed CHEESE spend into an estimated CPU/NET grant using
//! the DEX price of CHEESE in WAX and fixed network conversion ratios.
//! Input changes are debounced and superseded computations are discarded,
//! so the published estimate always reflects the latest inputs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::ResourceEstimate;

/// Rough network ratios: ~1 WAX buys 5000ms CPU or 500KB NET
pub const CPU_MS_PER_WAX: f64 = 5000.0;
pub const NET_BYTES_PER_WAX: f64 = 500.0 * 1024.0;

/// Inputs must be stable this long before a recomputation fires
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// DEX market-pair price feed with a fixed fallback rate.
/// An unreachable oracle degrades the estimate, it never fails it.
pub struct PriceOracle {
    http: reqwest::Client,
    url: String,
    fallback: f64,
}

impl PriceOracle {
    pub fn new(url: String, fallback: f64) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            fallback,
        }
    }

    /// Current CHEESE price in WAX, or the fallback rate when the oracle is
    /// unreachable or returns an unusable body.
    pub async fn price_in_wax(&self) -> f64 {
        match self.fetch_last_price().await {
            Some(price) if price > 0.0 => price,
            _ => {
                debug!(fallback = self.fallback, "price oracle unavailable, using fallback");
                self.fallback
            }
        }
    }

    async fn fetch_last_price(&self) -> Option<f64> {
        let response = self.http.get(&self.url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: Value = response.json().await.ok()?;
        body.get("last_price").and_then(Value::as_f64)
    }
}

/// Pure projection of a CHEESE spend onto resource grants at a given rate.
/// Zero spend has no meaningful estimate.
pub fn compute_estimate(cpu_amount: f64, net_amount: f64, price_in_wax: f64) -> Option<ResourceEstimate> {
    if cpu_amount <= 0.0 && net_amount <= 0.0 {
        return None;
    }

    let cpu_wax = cpu_amount * price_in_wax;
    let net_wax = net_amount * price_in_wax;

    Some(ResourceEstimate {
        price_in_wax,
        cpu_wax,
        net_wax,
        cpu_ms: cpu_wax * CPU_MS_PER_WAX,
        net_bytes: net_wax * NET_BYTES_PER_WAX,
    })
}

/// One-shot estimator: oracle rate plus the fixed conversion constants
pub struct Estimator {
    oracle: PriceOracle,
}

impl Estimator {
    pub fn new(oracle: PriceOracle) -> Self {
        Self { oracle }
    }

    /// Estimate for the given amounts. `None` when both are zero; the
    /// oracle is not consulted in that case.
    pub async fn quote(&self, cpu_amount: f64, net_amount: f64) -> Option<ResourceEstimate> {
        if cpu_amount <= 0.0 && net_amount <= 0.0 {
            return None;
        }
        let price = self.oracle.price_in_wax().await;
        compute_estimate(cpu_amount, net_amount, price)
    }
}

/// Debounced, staleness-checked estimate state.
///
/// Each `set_inputs` call bumps a generation counter and spawns a
/// computation keyed to it. The computation waits out the debounce window,
/// then re-checks the generation before fetching and again before
/// publishing, so a superseded input pair can never overwrite a newer
/// result.
pub struct EstimateTracker {
    estimator: Arc<Estimator>,
    generation: AtomicU64,
    current: RwLock<Option<ResourceEstimate>>,
}

impl EstimateTracker {
    pub fn new(estimator: Arc<Estimator>) -> Arc<Self> {
        Arc::new(Self {
            estimator,
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        })
    }

    /// Record a new input pair and schedule a recomputation after the
    /// debounce window. Zero inputs clear the estimate.
    pub fn set_inputs(self: &Arc<Self>, cpu_amount: f64, net_amount: f64) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tracker = Arc::clone(self);

        tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            if tracker.generation.load(Ordering::SeqCst) != generation {
                return; // superseded while debouncing
            }

            let estimate = tracker.estimator.quote(cpu_amount, net_amount).await;

            if tracker.generation.load(Ordering::SeqCst) != generation {
                return; // superseded while fetching
            }
            *tracker.current.write().await = estimate;
        });
    }

    /// Latest published estimate; `None` means no estimate (zero inputs or
    /// nothing computed yet)
    pub async fn current(&self) -> Option<ResourceEstimate> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_have_no_estimate() {
        assert!(compute_estimate(0.0, 0.0, 0.05).is_none());
    }

    #[test]
    fn cpu_only_estimate_uses_rate_and_constants() {
        let estimate = compute_estimate(10.0, 0.0, 0.002).expect("estimate");
        assert_eq!(estimate.cpu_wax, 0.02);
        assert_eq!(estimate.cpu_ms, 0.02 * CPU_MS_PER_WAX);
        assert_eq!(estimate.net_wax, 0.0);
        assert_eq!(estimate.net_bytes, 0.0);
    }

    #[test]
    fn mixed_estimate_scales_both_resources() {
        let estimate = compute_estimate(4.0, 6.0, 0.5).expect("estimate");
        assert_eq!(estimate.cpu_ms, 2.0 * CPU_MS_PER_WAX);
        assert_eq!(estimate.net_bytes, 3.0 * NET_BYTES_PER_WAX);
    }

    #[tokio::test]
    async fn unreachable_oracle_falls_back() {
        // Nothing listens on this port
        let oracle = PriceOracle::new("http://127.0.0.1:9/markets/748".to_string(), 0.001);
        assert_eq!(oracle.price_in_wax().await, 0.001);

        let estimator = Estimator::new(PriceOracle::new(
            "http://127.0.0.1:9/markets/748".to_string(),
            0.001,
        ));
        let estimate = estimator.quote(10.0, 0.0).await.expect("estimate");
        assert_eq!(estimate.price_in_wax, 0.001);
        assert_eq!(estimate.cpu_ms, 10.0 * 0.001 * CPU_MS_PER_WAX);
    }

    #[tokio::test]
    async fn quote_skips_oracle_for_zero_inputs() {
        let estimator = Estimator::new(PriceOracle::new(
            "http://127.0.0.1:9/markets/748".to_string(),
            0.001,
        ));
        assert!(estimator.quote(0.0, 0.0).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn superseded_inputs_never_overwrite_newer_result() {
        let estimator = Arc::new(Estimator::new(PriceOracle::new(
            "http://127.0.0.1:9/markets/748".to_string(),
            0.001,
        )));
        let tracker = EstimateTracker::new(estimator);

        // Rapid edits within the debounce window; only the last pair counts.
        tracker.set_inputs(100.0, 0.0);
        tracker.set_inputs(50.0, 0.0);
        tracker.set_inputs(10.0, 5.0);

        tokio::time::sleep(DEBOUNCE + Duration::from_millis(300)).await;

        let estimate = tracker.current().await.expect("estimate");
        assert_eq!(estimate.cpu_wax, 10.0 * 0.001);
        assert_eq!(estimate.net_wax, 5.0 * 0.001);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn zero_inputs_clear_a_previous_estimate() {
        let estimator = Arc::new(Estimator::new(PriceOracle::new(
            "http://127.0.0.1:9/markets/748".to_string(),
            0.001,
        )));
        let tracker = EstimateTracker::new(estimator);

        tracker.set_inputs(10.0, 0.0);
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(300)).await;
        assert!(tracker.current().await.is_some());

        tracker.set_inputs(0.0, 0.0);
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(300)).await;
        assert!(tracker.current().await.is_none());
    }
}
