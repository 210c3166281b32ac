//! Value types and asset-string helpers shared across the client

use serde::{Deserialize, Serialize};

/// Aggregate counters published by the service contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractStats {
    pub total_powerups: u64,
    /// Cumulative WAX spent on PowerUps, in WAX
    pub wax_burnt: f64,
    /// Cumulative CHEESE consumed by the service, in CHEESE
    pub cheese_nulled: f64,
}

/// Global PowerUp pool weights from the `powup.state` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpState {
    pub cpu_weight: f64,
    pub net_weight: f64,
    pub cpu_weight_ratio: f64,
    pub net_weight_ratio: f64,
}

/// Projected resource grant for a proposed CHEESE spend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEstimate {
    /// CHEESE price in WAX used for the projection
    pub price_in_wax: f64,
    pub cpu_wax: f64,
    pub net_wax: f64,
    pub cpu_ms: f64,
    pub net_bytes: f64,
}

/// User intent to rent resources; consumed by submission or discarded
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUpRequest {
    /// Explicit recipient; defaults to the signing account when absent
    pub recipient: Option<String>,
    pub cpu_amount: f64,
    pub net_amount: f64,
}

impl PowerUpRequest {
    pub fn total(&self) -> f64 {
        self.cpu_amount + self.net_amount
    }
}

/// Structured result of a confirmed PowerUp submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpReceipt {
    pub cpu_ms: f64,
    pub net_bytes: f64,
    pub total_spent: f64,
    pub recipient: String,
}

/// Parse the numeric amount out of an asset string like `"123.4500 CHEESE"`.
/// Malformed or empty input yields `0.0`, never an error.
pub fn parse_asset(asset: &str) -> f64 {
    asset
        .split_whitespace()
        .next()
        .and_then(|amount| amount.parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}

/// Format a token quantity the way the chain expects it: exactly four
/// decimal places followed by the symbol.
pub fn format_quantity(amount: f64, symbol: &str) -> String {
    format!("{amount:.4} {symbol}")
}

/// Check a name against the chain's account-name grammar: 1-12 characters,
/// each a lowercase letter, a digit 1-5, or a dot.
pub fn is_valid_account(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 12
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || (b'1'..=b'5').contains(&b) || b == b'.')
}

/// Human-readable byte count for NET grants
pub fn format_bytes(bytes: f64) -> String {
    if bytes >= 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else if bytes >= 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else {
        format!("{bytes:.0} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_asset_amount() {
        assert_eq!(parse_asset("123.4500 CHEESE"), 123.45);
        assert_eq!(parse_asset("0.0001 WAX"), 0.0001);
    }

    #[test]
    fn malformed_assets_parse_to_zero() {
        assert_eq!(parse_asset(""), 0.0);
        assert_eq!(parse_asset("CHEESE"), 0.0);
        assert_eq!(parse_asset("abc 123"), 0.0);
    }

    #[test]
    fn non_finite_amounts_parse_to_zero() {
        // str::parse::<f64> accepts these spellings; a NaN balance would
        // slip past every amount comparison downstream.
        assert_eq!(parse_asset("NaN CHEESE"), 0.0);
        assert_eq!(parse_asset("inf CHEESE"), 0.0);
        assert_eq!(parse_asset("-inf CHEESE"), 0.0);
    }

    #[test]
    fn formats_quantity_with_four_decimals() {
        assert_eq!(format_quantity(50.0, "CHEESE"), "50.0000 CHEESE");
        assert_eq!(format_quantity(0.5, "CHEESE"), "0.5000 CHEESE");
        assert_eq!(format_quantity(123.45678, "CHEESE"), "123.4568 CHEESE");
    }

    #[test]
    fn accepts_valid_account_names() {
        assert!(is_valid_account("abc.123"));
        assert!(is_valid_account("a"));
        assert!(is_valid_account("121212121212"));
        assert!(is_valid_account("waxacct.wam"));
    }

    #[test]
    fn rejects_invalid_account_names() {
        assert!(!is_valid_account(""));
        assert!(!is_valid_account("abcdefghijklm")); // 13 chars
        assert!(!is_valid_account("Abc"));
        assert!(!is_valid_account("abc6"));
        assert!(!is_valid_account("abc0"));
        assert!(!is_valid_account("abc 123"));
    }

    #[test]
    fn formats_bytes_by_magnitude() {
        assert_eq!(format_bytes(512.0), "512 bytes");
        assert_eq!(format_bytes(2048.0), "2.00 KB");
        assert_eq!(format_bytes(3.5 * 1024.0 * 1024.0), "3.50 MB");
    }
}
