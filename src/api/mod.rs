pub mod client;
pub mod config;

pub use client::Client;
pub use config::ApiConfig;
