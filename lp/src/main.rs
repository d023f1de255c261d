use anyhow::Context;
use tracing_subscriber::EnvFilter;

use uniswap_lp::config::LpConfig;
use uniswap_lp::v3_sdk::lp_client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = LpConfig::from_env().context("加载环境配置失败")?;
    tracing::info!(
        rpc_url = %config.rpc_url,
        fee = config.pool_fee.as_u32(),
        "starting liquidity provision"
    );

    let outcome = lp_client::provide_liquidity(&config)
        .await
        .context("流动性 mint 失败")?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
