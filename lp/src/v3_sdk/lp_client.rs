use alloy::{network::EthereumWallet, signers::local::PrivateKeySigner};
use anyhow::Context;

use crate::config::LpConfig;
use crate::core_sdk::currency::{Erc20Token, Erc20TokenBuilder};
use crate::prelude::*;
use crate::v3_sdk::{
    price_math, tick_range,
    uniswapv3_factory::{self, GetPoolParam, UniswapV3FactoryCommand, UniswapV3FactoryResult},
    uniswapv3_pool::{self, PoolState, UniswapV3PoolCommand, UniswapV3PoolResult},
    uniswapv3_position_manager::{
        self, MintPositionParams, UniswapV3PositionManagerCommand, UniswapV3PositionManagerResult,
    },
};

const BPS_DENOMINATOR: u64 = 10_000;

/// Mint parameters in loggable form, dumped before submission.
#[derive(Debug, Serialize)]
pub struct MintPlan {
    pub token0: String,
    pub token1: String,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: String,
    pub amount1_desired: String,
    pub amount0_min: String,
    pub amount1_min: String,
    pub recipient: String,
    pub deadline: String,
}

impl From<&MintPositionParams> for MintPlan {
    fn from(params: &MintPositionParams) -> Self {
        MintPlan {
            token0: params.token0.to_string(),
            token1: params.token1.to_string(),
            fee: params.fee.as_u32(),
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            amount0_desired: params.amount0_desired.to_string(),
            amount1_desired: params.amount1_desired.to_string(),
            amount0_min: params.amount0_min.to_string(),
            amount1_min: params.amount1_min.to_string(),
            recipient: params.recipient.to_string(),
            deadline: params.deadline.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MintOutcome {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Runs the whole provisioning flow once: resolve the pool, price it, pick
/// the tick band, then mint with half of each held balance.
pub async fn provide_liquidity(config: &LpConfig) -> Result<MintOutcome> {
    // 1. 构建钱包, recipient 即签名者地址
    let signer = PrivateKeySigner::from_str(&config.private_key).context("解析私钥失败")?;
    let recipient = signer.address();
    let wallet = EthereumWallet::from(signer);

    // 2. 通过 factory 查询 pool 地址
    let pool_address = match uniswapv3_factory::execute(
        UniswapV3FactoryCommand::GetPool(GetPoolParam {
            token_a: config.token_a,
            token_b: config.token_b,
            fee: config.pool_fee.as_u32(),
        }),
        config.factory,
        config.rpc_url.clone(),
    )
    .await
    .context("查询 pool 地址失败")?
    {
        UniswapV3FactoryResult::GetPool(address) => address,
        _ => anyhow::bail!("factory 返回了意外的结果"),
    };
    tracing::info!(pool = %pool_address, "resolved pool");

    // 3. 并发查询两个代币的 decimals/symbol
    let token_a = Erc20TokenBuilder::default()
        .address(config.token_a)
        .build()?;
    let token_b = Erc20TokenBuilder::default()
        .address(config.token_b)
        .build()?;
    let (token_a, token_b) = tokio::try_join!(
        token_a.update_token_info(&config.rpc_url),
        token_b.update_token_info(&config.rpc_url)
    )
    .context("查询代币信息失败")?;

    // 4. 查询钱包持仓
    let balance_a = token_a
        .balance_of(recipient, &config.rpc_url)
        .await
        .context("查询代币余额失败")?;
    let balance_b = token_b
        .balance_of(recipient, &config.rpc_url)
        .await
        .context("查询代币余额失败")?;
    tracing::info!(
        balance_a = Erc20Token::to_readable_amount(balance_a, token_a.decimals),
        balance_b = Erc20Token::to_readable_amount(balance_b, token_b.decimals),
        "wallet balances"
    );

    // 5. 读取池子状态, 把代币对齐到池子的 token0/token1 顺序
    let state = match uniswapv3_pool::execute(
        UniswapV3PoolCommand::GetState,
        pool_address,
        config.rpc_url.clone(),
    )
    .await
    .context("读取池子状态失败")?
    {
        UniswapV3PoolResult::GetState(state) => state,
        _ => anyhow::bail!("pool 返回了意外的结果"),
    };
    let ((token0, balance0), (token1, balance1)) =
        align_to_pool(&state, (token_a, balance_a), (token_b, balance_b))?;

    // 6. 换算现价
    let price = price_math::sqrt_price_to_price(state.sqrt_price_x96, token0.decimals, token1.decimals)?;
    tracing::info!(price, current_tick = state.tick, "pool spot price");

    // 7. 计算 tick 区间
    let range = tick_range::calculate_tick_range(
        price,
        config.price_range_percent,
        state.tick_spacing,
    )?;
    tracing::info!(
        tick_lower = range.tick_lower,
        tick_upper = range.tick_upper,
        "tick range"
    );

    // 8. 存入一半持仓, 按滑点参数计算最低成交量
    let amount0_desired = balance0 / U256::from(2);
    let amount1_desired = balance1 / U256::from(2);
    let amount0_min = minimum_amount(amount0_desired, config.slippage_tolerance);
    let amount1_min = minimum_amount(amount1_desired, config.slippage_tolerance);
    if amount0_min.is_zero() && amount1_min.is_zero() {
        tracing::warn!("slippage tolerance leaves the mint without a minimum amount floor");
    }

    // 9. 授权 position manager 动用存入量
    ensure_allowance(
        &token0,
        recipient,
        config.position_manager,
        amount0_desired,
        wallet.clone(),
        &config.rpc_url,
    )
    .await?;
    ensure_allowance(
        &token1,
        recipient,
        config.position_manager,
        amount1_desired,
        wallet.clone(),
        &config.rpc_url,
    )
    .await?;

    // 10. 设置交易截止时间
    let deadline =
        (chrono::Utc::now() + chrono::Duration::minutes(config.deadline_minutes)).timestamp();

    let params = MintPositionParams {
        token0: state.token0,
        token1: state.token1,
        fee: config.pool_fee,
        tick_lower: range.tick_lower,
        tick_upper: range.tick_upper,
        amount0_desired,
        amount1_desired,
        amount0_min,
        amount1_min,
        recipient,
        deadline: U256::from(deadline as u64),
    };
    tracing::info!(
        params = %serde_json::to_string_pretty(&MintPlan::from(&params))?,
        "mint params"
    );

    // 11. 提交 mint 交易并等待回执
    let receipt = match uniswapv3_position_manager::execute(
        UniswapV3PositionManagerCommand::Mint(params),
        config.position_manager,
        wallet,
        config.gas_limit,
        config.rpc_url.clone(),
    )
    .await
    .context("提交 mint 交易失败")?
    {
        UniswapV3PositionManagerResult::Mint(receipt) => receipt,
    };
    tracing::info!(tx_hash = %receipt.tx_hash, "mint confirmed");

    Ok(MintOutcome {
        tx_hash: receipt.tx_hash.to_string(),
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        tick_lower: range.tick_lower,
        tick_upper: range.tick_upper,
    })
}

/// Reorders the configured pair so amounts and decimals follow the pool's
/// token0/token1 sorting.
fn align_to_pool(
    state: &PoolState,
    token_a: (Erc20Token, U256),
    token_b: (Erc20Token, U256),
) -> Result<((Erc20Token, U256), (Erc20Token, U256))> {
    if token_a.0.address == state.token0 && token_b.0.address == state.token1 {
        Ok((token_a, token_b))
    } else if token_b.0.address == state.token0 && token_a.0.address == state.token1 {
        Ok((token_b, token_a))
    } else {
        anyhow::bail!(
            "pool 代币 {} / {} 与配置的代币不一致",
            state.token0,
            state.token1
        )
    }
}

/// desired * (1 - tolerance), floored to a basis point.
fn minimum_amount(desired: U256, slippage_tolerance: f64) -> U256 {
    let keep_bps = ((1.0 - slippage_tolerance) * BPS_DENOMINATOR as f64).round() as u64;
    desired * U256::from(keep_bps) / U256::from(BPS_DENOMINATOR)
}

async fn ensure_allowance(
    token: &Erc20Token,
    owner: Address,
    spender: Address,
    amount: U256,
    wallet: EthereumWallet,
    rpc_url: &str,
) -> Result<()> {
    if amount.is_zero() {
        return Ok(());
    }
    let current = token
        .allowance(owner, spender, rpc_url)
        .await
        .context("查询授权额度失败")?;
    if current >= amount {
        return Ok(());
    }
    tracing::info!(token = %token.address, amount = %amount, "approving position manager");
    token
        .approve(spender, amount, wallet, rpc_url)
        .await
        .context("授权失败")
}
