use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Client configuration loaded from a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Chain endpoints tried in order for every table read
    pub endpoints: Vec<String>,

    /// Chain id, handed to the signing provider when opening sessions
    pub chain_id: String,

    /// Token contract account (holds the `accounts` balance table)
    pub token_contract: String,

    /// Token symbol, appended to every formatted quantity
    pub token_symbol: String,

    /// Service account receiving PowerUp transfers (holds the `stats` table)
    pub service_account: String,

    /// DEX market endpoint returning `{ last_price }` in WAX
    pub oracle_url: String,

    /// Rate used when the price oracle is unreachable
    pub fallback_price: f64,

    /// Application name, shown by the signing provider's UI
    pub app_name: String,
}

impl ChainConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;

        let config: ChainConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path.as_ref(), content)
            .map_err(|e| Error::Config(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(Error::Config("at least one endpoint required".into()));
        }
        for account in [&self.token_contract, &self.service_account] {
            if account.is_empty() {
                return Err(Error::Config("contract accounts must not be empty".into()));
            }
        }
        if self.token_symbol.is_empty() {
            return Err(Error::Config("token symbol must not be empty".into()));
        }
        if self.fallback_price <= 0.0 {
            return Err(Error::Config("fallback_price must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                "https://wax.eosusa.io".to_string(),
                "https://api.waxsweden.org".to_string(),
                "https://wax.greymass.com".to_string(),
            ],
            chain_id: "1064487b3cd1a897ce03ae5b6a865651747e2e152090f99c1d19d44e01aea5a4"
                .to_string(),
            token_contract: "cheeseburger".to_string(),
            token_symbol: "CHEESE".to_string(),
            service_account: "cheesepowerz".to_string(),
            oracle_url: "https://wax.alcor.exchange/api/markets/748".to_string(),
            fallback_price: 0.001,
            app_name: "CheeseUp".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ChainConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_endpoints() {
        let mut config = ChainConfig::default();
        config.endpoints.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nonpositive_fallback_price() {
        let mut config = ChainConfig::default();
        config.fallback_price = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cheeseup.toml");

        let config = ChainConfig::default();
        config.save(&path).expect("save");
        let loaded = ChainConfig::load(&path).expect("load");

        assert_eq!(loaded.endpoints, config.endpoints);
        assert_eq!(loaded.token_contract, config.token_contract);
        assert_eq!(loaded.service_account, config.service_account);
        assert_eq!(loaded.oracle_url, config.oracle_url);
    }
}
