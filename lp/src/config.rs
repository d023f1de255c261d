use std::env;

use crate::prelude::*;
use crate::v3_sdk::uniswapv3_pool::UniswapPoolFee;

pub const DEFAULT_POOL_FEE: u32 = 3000;
pub const DEFAULT_PRICE_RANGE_PERCENT: f64 = 0.05;
/// 1.0 disables the minimum amount floor entirely.
pub const DEFAULT_SLIPPAGE_TOLERANCE: f64 = 1.0;
pub const DEFAULT_DEADLINE_MINUTES: i64 = 200;
pub const DEFAULT_GAS_LIMIT: u128 = 200_000;

/// Everything a single provisioning run needs, read once from the
/// environment.
#[derive(Debug, Clone)]
pub struct LpConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub token_a: Address,
    pub token_b: Address,
    pub position_manager: Address,
    pub factory: Address,
    pub pool_fee: UniswapPoolFee,
    pub price_range_percent: f64,
    pub slippage_tolerance: f64,
    pub deadline_minutes: i64,
    pub gas_limit: u128,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("缺少环境变量 {0}")]
    MissingEnv(String),

    #[error("环境变量 {0} 格式不正确: {1}")]
    InvalidEnv(String, String),
}

impl LpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let pool_fee = UniswapPoolFee::try_from(optional_parsed("POOL_FEE", DEFAULT_POOL_FEE)?)
            .map_err(|e| ConfigError::InvalidEnv("POOL_FEE".to_string(), e.to_string()))?;

        let price_range_percent =
            optional_parsed("PRICE_RANGE_PERCENT", DEFAULT_PRICE_RANGE_PERCENT)?;
        if !(price_range_percent > 0.0 && price_range_percent < 1.0) {
            return Err(ConfigError::InvalidEnv(
                "PRICE_RANGE_PERCENT".to_string(),
                format!("{} 不在 (0, 1) 区间", price_range_percent),
            ));
        }

        let slippage_tolerance = optional_parsed("SLIPPAGE_TOLERANCE", DEFAULT_SLIPPAGE_TOLERANCE)?;
        if !(slippage_tolerance > 0.0 && slippage_tolerance <= 1.0) {
            return Err(ConfigError::InvalidEnv(
                "SLIPPAGE_TOLERANCE".to_string(),
                format!("{} 不在 (0, 1] 区间", slippage_tolerance),
            ));
        }

        let deadline_minutes = optional_parsed("DEADLINE_MINUTES", DEFAULT_DEADLINE_MINUTES)?;
        if deadline_minutes <= 0 {
            return Err(ConfigError::InvalidEnv(
                "DEADLINE_MINUTES".to_string(),
                format!("{} 必须为正数", deadline_minutes),
            ));
        }

        let gas_limit = optional_parsed("GAS_LIMIT", DEFAULT_GAS_LIMIT)?;
        if gas_limit == 0 {
            return Err(ConfigError::InvalidEnv(
                "GAS_LIMIT".to_string(),
                "必须为正数".to_string(),
            ));
        }

        Ok(Self {
            rpc_url: required("RPC_URL")?,
            private_key: required("PRIVATE_KEY")?,
            token_a: required_address("TOKEN_A")?,
            token_b: required_address("TOKEN_B")?,
            position_manager: required_address("NFPM")?,
            factory: required_address("UNISWAP_V3_FACTORY")?,
            pool_fee,
            price_range_percent,
            slippage_tolerance,
            deadline_minutes,
            gas_limit,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))
}

fn required_address(name: &str) -> Result<Address, ConfigError> {
    Address::from_str(&required(name)?)
        .map_err(|e| ConfigError::InvalidEnv(name.to_string(), e.to_string()))
}

fn optional_parsed<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnv(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
