pub mod lp_client;
pub mod price_math;
pub mod tick_math;
pub mod tick_range;
pub mod uniswapv3_factory;
pub mod uniswapv3_pool;
pub mod uniswapv3_position_manager;
