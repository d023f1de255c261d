pub mod config;
pub mod core_sdk;
pub mod prelude;
pub mod v3_sdk;
