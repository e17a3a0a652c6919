pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod players;
pub mod proxy;
pub mod tiers;
pub mod week;
