//! Configuration loading for naomi
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NAOMI_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./naomi.toml` or `./.naomi.toml`
//! 4. Global: `~/.config/naomi/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    CalendarBackend, FileAssistantConfig, FileCalendarConfig, FileConfig, FileEmailConfig,
    FileGeminiConfig, FileLoggingConfig, FileSheetsConfig,
};
pub use loader::{ConfigError, ConfigLoader};
