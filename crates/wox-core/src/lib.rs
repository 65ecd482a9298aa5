//! Core types for the Wox query box.
//!
//! This crate contains the data shared between the query box engine and
//! whatever sits on either side of it:
//! - Queries and result batches
//! - Result items, actions, icons and previews
//! - Configuration types
//! - Error types

mod config;
mod error;
mod item;
mod query;

pub use config::{config_dir, config_path, LauncherConfig, QueryConfig, CONFIG_FILE_NAME};
pub use error::{ChannelError, ConfigError};
pub use item::{ImageType, Preview, ResultAction, ResultItem, WoxImage};
pub use query::{Query, QueryType, ResultBatch};
