//! CLI command implementations.
//!
//! - **classify**: extract and classify a translation unit AST dump
//! - **init**: write a default `.metaclassify.toml`

pub mod classify;
pub mod init;

pub use classify::{classify_project, ClassifyConfig};
pub use init::init_config;
