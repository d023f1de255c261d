use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::ProviderBuilder,
};
use alloy_sol_types::SolCall;
use derive_builder::Builder;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use alloy::{primitives::utils::format_units, sol};

use crate::prelude::*;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    ERC20,
    "src/abi/erc20.json"
);

#[derive(Debug, Clone, Builder)]
pub struct Erc20Token {
    #[builder(default = "1")]
    pub chain_id: u64,
    pub address: Address,
    #[builder(default = "18")]
    pub decimals: u8,
    #[builder(default = "Some(\"Unknown\".to_string())")]
    pub symbol: Option<String>,
    #[builder(default = "Some(\"Unknown\".to_string())")]
    pub name: Option<String>,
}

// update decimals name symbol from rpc url
impl Erc20Token {
    pub async fn update_token_info(mut self, rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().on_builtin(rpc_url).await?;
        let client = Arc::new(provider);
        let contract = ERC20::new(self.address, client);
        let decimals = contract.decimals().call().await?._0;
        let symbol = contract.symbol().call().await?._0;
        let name = contract.name().call().await?._0;
        self.decimals = decimals;
        self.symbol = Some(symbol);
        self.name = Some(name);
        Ok(self)
    }

    pub async fn balance_of(&self, owner: Address, rpc_url: &str) -> Result<U256> {
        let provider = ProviderBuilder::new().on_builtin(rpc_url).await?;
        let client = Arc::new(provider);
        let contract = ERC20::new(self.address, client);
        Ok(contract.balanceOf(owner).call().await?._0)
    }

    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
        rpc_url: &str,
    ) -> Result<U256> {
        let provider = ProviderBuilder::new().on_builtin(rpc_url).await?;
        let client = Arc::new(provider);
        let contract = ERC20::new(self.address, client);
        Ok(contract.allowance(owner, spender).call().await?._0)
    }

    /// Sends an approve transaction through the wallet and waits for its
    /// inclusion receipt.
    pub async fn approve(
        &self,
        spender: Address,
        amount: U256,
        wallet: EthereumWallet,
        rpc_url: &str,
    ) -> Result<()> {
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_builtin(rpc_url)
            .await?;
        let client = Arc::new(provider);
        let contract = ERC20::new(self.address, client);
        let receipt = contract
            .approve(spender, amount)
            .send()
            .await?
            .get_receipt()
            .await?;
        if !receipt.status() {
            anyhow::bail!("approve 交易被回滚 {}", receipt.transaction_hash);
        }
        Ok(())
    }

    pub fn from_readable_amount(amount_in: Decimal, decimals: u8) -> U256 {
        let factor = Decimal::new(10_i64.pow(decimals as u32), 0);
        U256::from((amount_in * factor).to_u128().unwrap())
    }

    pub fn to_readable_amount(amount_in: U256, decimals: u8) -> f64 {
        let num: String = format_units(amount_in, decimals).unwrap();
        num.parse::<f64>().unwrap()
    }

    pub fn approve_call_data(&self, spender: Address, human_readable_amount: &str) -> Vec<u8> {
        let amount = Self::from_readable_amount(
            Decimal::from_str(human_readable_amount).unwrap(),
            self.decimals,
        );
        let approve_call_data = ERC20::approveCall::abi_encode(&ERC20::approveCall {
            _spender: spender,
            _value: amount,
        });
        approve_call_data
    }
}
