use std::sync::Arc;

use anyhow::Result;

use crate::prelude::*;
use alloy::{
    providers::ProviderBuilder,
    rpc::types::TransactionRequest,
    sol,
};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    UNIV3_POOL,
    "src/abi/uniswapv3_pool.json"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniswapPoolFee {
    Fee10000, // 1%
    Fee3000,  // 0.3%
    Fee500,   // 0.05%
    Fee100,   // 0.01%
}

impl UniswapPoolFee {
    pub fn as_u32(&self) -> u32 {
        match self {
            UniswapPoolFee::Fee10000 => 10000,
            UniswapPoolFee::Fee3000 => 3000,
            UniswapPoolFee::Fee500 => 500,
            UniswapPoolFee::Fee100 => 100,
        }
    }

    /// Canonical tick spacing enforced by the factory for each fee tier.
    pub fn tick_spacing(&self) -> i32 {
        match self {
            UniswapPoolFee::Fee10000 => 200,
            UniswapPoolFee::Fee3000 => 60,
            UniswapPoolFee::Fee500 => 10,
            UniswapPoolFee::Fee100 => 1,
        }
    }
}

impl TryFrom<u32> for UniswapPoolFee {
    type Error = UniswapV3PoolError;

    fn try_from(fee: u32) -> std::result::Result<Self, Self::Error> {
        match fee {
            10000 => Ok(UniswapPoolFee::Fee10000),
            3000 => Ok(UniswapPoolFee::Fee3000),
            500 => Ok(UniswapPoolFee::Fee500),
            100 => Ok(UniswapPoolFee::Fee100),
            _ => Err(UniswapV3PoolError::UnsupportedFee(fee)),
        }
    }
}

/// One read of everything the mint flow needs from the pool.
#[derive(Debug, Clone)]
pub struct PoolState {
    pub sqrt_price_x96: U256, // 当前价格的平方根 * 2^96
    pub tick: i32,            // 当前 tick
    pub tick_spacing: i32,
    pub token0: Address,
    pub token1: Address,
    pub liquidity: u128, // 当前流动性
}

pub enum UniswapV3PoolCommand {
    /// Reads slot0, token ordering, tick spacing and in-range liquidity.
    GetState,
    /// Builds the unsigned transaction that sets the starting price of a
    /// freshly created pool.
    Initialize { sqrt_price_x96: U256 },
}

pub enum UniswapV3PoolResult {
    GetState(PoolState),
    Initialize(TransactionRequest),
}

#[derive(Debug, thiserror::Error)]
pub enum UniswapV3PoolError {
    #[error("请替换rpc url{0}")]
    InvalidRpcUrl(String),

    #[error("无法读取池子状态{0}")]
    GetStateError(String),

    #[error("不支持的池子费率{0}")]
    UnsupportedFee(u32),

    #[error("tick 数值超出 int24 范围{0}")]
    TickOverflow(String),
}

pub async fn execute(
    command: UniswapV3PoolCommand,
    pool_address: Address,
    rpc_url: String,
) -> Result<UniswapV3PoolResult, UniswapV3PoolError> {
    let provider = ProviderBuilder::new()
        .on_builtin(&rpc_url)
        .await
        .map_err(|e| UniswapV3PoolError::InvalidRpcUrl(e.to_string()))?;

    let client = Arc::new(provider);
    let contract = UNIV3_POOL::new(pool_address, client);
    match command {
        UniswapV3PoolCommand::GetState => {
            let slot0 = contract
                .slot0()
                .call()
                .await
                .map_err(|e| UniswapV3PoolError::GetStateError(e.to_string()))?;
            let token0 = contract
                .token0()
                .call()
                .await
                .map_err(|e| UniswapV3PoolError::GetStateError(e.to_string()))?
                ._0;
            let token1 = contract
                .token1()
                .call()
                .await
                .map_err(|e| UniswapV3PoolError::GetStateError(e.to_string()))?
                ._0;
            let tick_spacing = contract
                .tickSpacing()
                .call()
                .await
                .map_err(|e| UniswapV3PoolError::GetStateError(e.to_string()))?
                ._0;
            let liquidity = contract
                .liquidity()
                .call()
                .await
                .map_err(|e| UniswapV3PoolError::GetStateError(e.to_string()))?
                ._0;

            let state = PoolState {
                sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
                tick: i32::try_from(slot0.tick)
                    .map_err(|e| UniswapV3PoolError::TickOverflow(e.to_string()))?,
                tick_spacing: i32::try_from(tick_spacing)
                    .map_err(|e| UniswapV3PoolError::TickOverflow(e.to_string()))?,
                token0,
                token1,
                liquidity,
            };
            Ok(UniswapV3PoolResult::GetState(state))
        }
        UniswapV3PoolCommand::Initialize { sqrt_price_x96 } => {
            Ok(UniswapV3PoolResult::Initialize(
                contract
                    .initialize(U160::from(sqrt_price_x96))
                    .into_transaction_request(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn fee_tiers_map_onto_canonical_tick_spacings() {
        assert_eq!(UniswapPoolFee::Fee100.tick_spacing(), 1);
        assert_eq!(UniswapPoolFee::Fee500.tick_spacing(), 10);
        assert_eq!(UniswapPoolFee::Fee3000.tick_spacing(), 60);
        assert_eq!(UniswapPoolFee::Fee10000.tick_spacing(), 200);
    }

    #[test]
    fn fee_tier_round_trips_through_u32() {
        for fee in [
            UniswapPoolFee::Fee100,
            UniswapPoolFee::Fee500,
            UniswapPoolFee::Fee3000,
            UniswapPoolFee::Fee10000,
        ] {
            assert_eq!(UniswapPoolFee::try_from(fee.as_u32()).unwrap(), fee);
        }
        let res = UniswapPoolFee::try_from(1234);
        assert_eq!(
            res.unwrap_err().to_string(),
            UniswapV3PoolError::UnsupportedFee(1234).to_string()
        );
    }

    #[tokio::test]
    async fn test_initialize_call_data() {
        let pool = Address::from_str("0x8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8").unwrap();
        // parity price with equal decimals lands exactly on 2^96
        let sqrt_price_x96 = crate::v3_sdk::price_math::price_to_sqrt_price(1.0, 18, 18).unwrap();
        let res = execute(
            UniswapV3PoolCommand::Initialize { sqrt_price_x96 },
            pool,
            "https://eth.llamarpc.com".to_string(),
        )
        .await
        .unwrap();
        if let UniswapV3PoolResult::Initialize(tx) = res {
            let data = tx.input.input.unwrap();
            assert_eq!(
                "f637731d0000000000000000000000000000000000000001000000000000000000000000",
                hex::encode(data)
            );
        }
    }

    /// USDC/WETH 0.3% pool on mainnet.
    #[tokio::test]
    async fn test_get_state_online() {
        let pool = Address::from_str("0x8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8").unwrap();
        let res = execute(
            UniswapV3PoolCommand::GetState,
            pool,
            "https://eth.llamarpc.com".to_string(),
        )
        .await
        .unwrap();
        if let UniswapV3PoolResult::GetState(state) = res {
            assert_eq!(state.tick_spacing, 60);
            assert_eq!(
                state.token0,
                Address::from_str("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap()
            );
            assert!(state.sqrt_price_x96 > U256::ZERO);
        }
    }
}
