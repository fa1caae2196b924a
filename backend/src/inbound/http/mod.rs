//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;

pub use error::{ApiResult, json_config};
