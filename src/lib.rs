pub mod client;
pub mod config;
pub mod default_colors;
pub mod export;
pub mod manager;
pub mod render;
pub mod traits;
pub mod types;
