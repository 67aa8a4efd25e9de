pub mod client;
pub mod config;

pub use client::HttpGameApi;
pub use config::ClientConfig;
