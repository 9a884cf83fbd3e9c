//! Configuration subsystem.
//!
//! `schema.rs` defines the serde-default TOML structure; `loader.rs` reads,
//! applies environment overrides, and validates.

pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, load_config, validate_config, ConfigError};
pub use schema::{
    ArbiterConfig, BreakerConfig, ModelConfig, NestConfig, ScoringConfig, ServerConfig,
};
