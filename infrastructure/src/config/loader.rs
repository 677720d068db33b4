//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROJECT_FILES: [&str; 2] = ["naomi.toml", ".naomi.toml"];
const ENV_PREFIX: &str = "NAOMI_";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `.env` from the working directory (or a parent), if present.
    ///
    /// Existing environment variables win over the file.
    pub fn load_dotenv() -> Option<PathBuf> {
        dotenvy::dotenv().ok()
    }

    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `NAOMI_` environment variables (`NAOMI_GEMINI__MODEL` → `gemini.model`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./naomi.toml` or `./.naomi.toml`
    /// 4. Global: `~/.config/naomi/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();
        Self::figment(global.as_deref(), project.as_deref(), config_path.map(|p| p.as_path()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Defaults plus environment overrides (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// File layers only, lowest priority first.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project, explicit].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }
        figment
    }

    /// Get the global config file path (`<config dir>/naomi/config.toml`)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("naomi").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {}* (nested keys split on '__')", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./naomi.toml or ./.naomi.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
