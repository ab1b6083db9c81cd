pub mod error;
pub mod rejection;
pub mod save_config;
pub mod save_data;
pub mod save_store;
