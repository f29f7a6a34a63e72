//! Configuration for dataguard: the permissive `dataguard.toml` model and
//! its resolution (with CLI overrides) into a strict effective config.

#![forbid(unsafe_code)]

pub mod model;
pub mod resolve;

pub use model::{DatabaseConfig, DataguardConfigV1};
pub use resolve::{
    DatabaseKind, Overrides, ResolvedConfig, ResolvedDatabase, parse_config_toml, parse_severity,
    resolve_config,
};
