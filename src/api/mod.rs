//! HTTP API endpoints.

pub mod health;
pub mod player;
pub mod recordings;
