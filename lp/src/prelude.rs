pub use alloy::hex;
pub use alloy::primitives::{Address, U160, U256, U512};
pub use anyhow::Result;
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
pub use std::str::FromStr;

pub use serde::{Deserialize, Serialize};
