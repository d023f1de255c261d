use std::sync::Arc;

use anyhow::Result;

use crate::prelude::*;
use crate::v3_sdk::uniswapv3_pool::UniswapPoolFee;
use alloy::{
    network::EthereumWallet,
    primitives::{
        aliases::{I24, U24},
        TxHash,
    },
    providers::ProviderBuilder,
    sol,
};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    UNIV3_NFPM,
    "src/abi/nonfungible_position_manager.json"
);

pub struct MintPositionParams {
    pub token0: Address,
    pub token1: Address,
    pub fee: UniswapPoolFee,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub recipient: Address,
    pub deadline: U256,
}

impl TryFrom<MintPositionParams>
    for crate::v3_sdk::uniswapv3_position_manager::INonfungiblePositionManager::MintParams
{
    type Error = UniswapV3PositionManagerError;
    fn try_from(value: MintPositionParams) -> std::result::Result<Self, Self::Error> {
        let val = INonfungiblePositionManager::MintParams {
            token0: value.token0,
            token1: value.token1,
            fee: U24::from(value.fee.as_u32()),
            tickLower: I24::try_from(value.tick_lower)
                .map_err(|e| UniswapV3PositionManagerError::TickOverflow(e.to_string()))?,
            tickUpper: I24::try_from(value.tick_upper)
                .map_err(|e| UniswapV3PositionManagerError::TickOverflow(e.to_string()))?,
            amount0Desired: value.amount0_desired,
            amount1Desired: value.amount1_desired,
            amount0Min: value.amount0_min,
            amount1Min: value.amount1_min,
            recipient: value.recipient,
            deadline: value.deadline,
        };
        Ok(val)
    }
}

/// Inclusion proof of the mint transaction.
#[derive(Debug, Clone)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u128,
}

pub enum UniswapV3PositionManagerCommand {
    /// The mint function deposits both tokens into the given tick range and
    /// issues the position as an NFT to the recipient
    Mint(MintPositionParams),
}

pub enum UniswapV3PositionManagerResult {
    Mint(MintReceipt),
}

#[derive(Debug, thiserror::Error)]
pub enum UniswapV3PositionManagerError {
    #[error("请替换rpc url{0}")]
    InvalidRpcUrl(String),

    #[error("tick 数值超出 int24 范围{0}")]
    TickOverflow(String),

    #[error("mint 交易发送失败{0}")]
    SendError(String),

    #[error("等待mint 回执失败{0}")]
    ReceiptError(String),

    #[error("mint 交易被回滚 {0}")]
    MintReverted(TxHash),
}

pub async fn execute(
    command: UniswapV3PositionManagerCommand,
    nfpm_address: Address,
    wallet: EthereumWallet,
    gas_limit: u128,
    rpc_url: String,
) -> Result<UniswapV3PositionManagerResult, UniswapV3PositionManagerError> {
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_builtin(&rpc_url)
        .await
        .map_err(|e| UniswapV3PositionManagerError::InvalidRpcUrl(e.to_string()))?;

    let client = Arc::new(provider);
    let contract = UNIV3_NFPM::new(nfpm_address, client);
    match command {
        UniswapV3PositionManagerCommand::Mint(params) => {
            let receipt = contract
                .mint(params.try_into()?)
                .gas(gas_limit.try_into().unwrap())
                .send()
                .await
                .map_err(|e| UniswapV3PositionManagerError::SendError(e.to_string()))?
                .get_receipt()
                .await
                .map_err(|e| UniswapV3PositionManagerError::ReceiptError(e.to_string()))?;
            if !receipt.status() {
                return Err(UniswapV3PositionManagerError::MintReverted(
                    receipt.transaction_hash,
                ));
            }
            Ok(UniswapV3PositionManagerResult::Mint(MintReceipt {
                tx_hash: receipt.transaction_hash,
                block_number: receipt.block_number,
                gas_used: receipt.gas_used,
            }))
        }
    }
}
