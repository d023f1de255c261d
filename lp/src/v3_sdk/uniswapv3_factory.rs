use std::sync::Arc;

use anyhow::Result;

use crate::prelude::*;
use alloy::{
    primitives::aliases::U24,
    providers::ProviderBuilder,
    rpc::types::TransactionRequest,
    sol,
};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    UNIV3_FACTORY,
    "src/abi/uniswapv3_factory.json"
);

pub struct GetPoolParam {
    pub token_a: Address,
    pub token_b: Address,
    pub fee: u32,
}

pub struct CreatePoolParam {
    pub token_a: Address,
    pub token_b: Address,
    pub fee: u32,
}

pub enum UniswapV3FactoryCommand {
    /// Resolves the pool deployed for a token pair and fee tier.
    GetPool(GetPoolParam),
    /// Builds the unsigned pool deployment transaction.
    CreatePool(CreatePoolParam),
}

pub enum UniswapV3FactoryResult {
    GetPool(Address),
    CreatePool(TransactionRequest),
}

#[derive(Debug, thiserror::Error)]
pub enum UniswapV3FactoryError {
    #[error("请替换rpc url{0}")]
    InvalidRpcUrl(String),

    #[error("无法查询pool address，请确认是否开盘或poolfee设置是否正确{0}")]
    GetPoolError(String),

    #[error("pool 不存在，请确认代币地址与费率")]
    PoolNotFound,
}

pub async fn execute(
    command: UniswapV3FactoryCommand,
    factory_address: Address,
    rpc_url: String,
) -> Result<UniswapV3FactoryResult, UniswapV3FactoryError> {
    let provider = ProviderBuilder::new()
        .on_builtin(&rpc_url)
        .await
        .map_err(|e| UniswapV3FactoryError::InvalidRpcUrl(e.to_string()))?;

    let client = Arc::new(provider);
    let contract = UNIV3_FACTORY::new(factory_address, client);
    match command {
        UniswapV3FactoryCommand::GetPool(params) => {
            let pool_address = contract
                .getPool(params.token_a, params.token_b, U24::from(params.fee))
                .call()
                .await
                .map_err(|e| UniswapV3FactoryError::GetPoolError(e.to_string()))?
                ._0;
            if pool_address == Address::ZERO {
                return Err(UniswapV3FactoryError::PoolNotFound);
            }
            Ok(UniswapV3FactoryResult::GetPool(pool_address))
        }
        UniswapV3FactoryCommand::CreatePool(params) => Ok(UniswapV3FactoryResult::CreatePool(
            contract
                .createPool(params.token_a, params.token_b, U24::from(params.fee))
                .into_transaction_request(),
        )),
    }
}

#[cfg(test)]
mod tests {

    use crate::v3_sdk::uniswapv3_pool::UniswapPoolFee;

    use super::*;

    const MAINNET_FACTORY: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";

    #[tokio::test]
    pub async fn test_get_pool_address_online() {
        let usdc = Address::from_str("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        let weth = Address::from_str("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();

        let get_pool = UniswapV3FactoryCommand::GetPool(GetPoolParam {
            token_a: usdc,
            token_b: weth,
            fee: UniswapPoolFee::Fee3000.as_u32(),
        });

        let res = execute(
            get_pool,
            Address::from_str(MAINNET_FACTORY).unwrap(),
            "https://eth.llamarpc.com".to_string(),
        )
        .await
        .unwrap();
        if let UniswapV3FactoryResult::GetPool(pool_address) = res {
            assert_eq!(
                Address::from_str("0x8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8").unwrap(),
                pool_address
            );
        }
    }

    #[tokio::test]
    pub async fn test_create_pool_call_data() {
        let usdc = Address::from_str("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        let weth = Address::from_str("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();

        let res = execute(
            UniswapV3FactoryCommand::CreatePool(CreatePoolParam {
                token_a: usdc,
                token_b: weth,
                fee: UniswapPoolFee::Fee3000.as_u32(),
            }),
            Address::from_str(MAINNET_FACTORY).unwrap(),
            "https://eth.llamarpc.com".to_string(),
        )
        .await
        .unwrap();
        if let UniswapV3FactoryResult::CreatePool(tx) = res {
            let data = tx.input.input.unwrap();
            assert_eq!(
                "a1671295000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc20000000000000000000000000000000000000000000000000000000000000bb8",
                hex::encode(data)
            );
        }
    }
}
