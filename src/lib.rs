pub mod antiflood;
pub mod config;
pub mod error;
pub mod event;
pub mod rate_limiter;
pub mod utils;
