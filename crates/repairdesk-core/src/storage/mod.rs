mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{Config, LoggingConfig, SchedulingConfig, StorageConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `REPAIRDESK_DATA_DIR` overrides the location outright. Otherwise it is
/// `~/.config/repairdesk[-dev]/`, with `REPAIRDESK_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("REPAIRDESK_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("REPAIRDESK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("repairdesk-dev")
            } else {
                base_dir.join("repairdesk")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
