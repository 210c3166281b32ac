//! CheeseUp client core
//!
//! Client-side logic for renting WAX CPU/NET resources through the PowerUp
//! pool, paid in CHEESE. Provides high-level abstractions for:
//! - Wallet session lifecycle against a pluggable signing provider
//! - Resilient table reads across redundant chain endpoints
//! - Balance and contract statistics queries
//! - Debounced resource estimates backed by a DEX price oracle
//! - PowerUp transfer composition, validation, and submission

pub mod config;
pub mod error;
pub mod estimate;
pub mod powerup;
pub mod provider;
pub mod query;
pub mod reader;
pub mod session;
pub mod types;

pub use config::ChainConfig;
pub use error::{Error, Result};
pub use estimate::{EstimateTracker, Estimator, PriceOracle};
pub use powerup::PowerUpService;
pub use provider::{Action, ProviderError, Session, SigningProvider, TransactReceipt};
pub use query::{QueryClient, TableQuery};
pub use reader::ChainReader;
pub use session::{WalletManager, WalletState};
pub use types::{
    ContractStats, PowerUpReceipt, PowerUpRequest, PowerUpState, ResourceEstimate,
};
