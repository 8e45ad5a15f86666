use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

pub static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub relocate: String,
    pub dependencies: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
    const RELOCATE_LEVEL: &str = "warn";
    const DEPENDENCIES_LEVEL: &str = "error";

    fn default() -> Self {
        LoggingConfig {
            relocate: Self::RELOCATE_LEVEL.to_string(),
            dependencies: Self::DEPENDENCIES_LEVEL.to_string(),
        }
    }

    fn ensure_valid(&mut self) {
        self.relocate = Self::valid_level("nightingale-relocate", &self.relocate, Self::RELOCATE_LEVEL);
        self.dependencies = Self::valid_level("dependencies", &self.dependencies, Self::DEPENDENCIES_LEVEL);
    }

    // Trims and lowercases a configured level, falling back to the default
    // (and telling the user) when it isn't a known level
    fn valid_level(name: &str, configured: &str, default: &str) -> String {
        let level = configured.trim().to_ascii_lowercase();
        if Self::LOG_LEVELS.contains(&level.as_str()) {
            level
        } else {
            eprintln!(
                "Config error: {} log level of '{}' is invalid - using default of '{}'",
                name, configured, default
            );
            default.to_owned()
        }
    }

    /// flexi_logger specification string, e.g. `error, nightingale_relocate=info`
    pub fn log_spec(&self) -> String {
        format!(
            "{}, {}={}",
            self.dependencies,
            env!("CARGO_CRATE_NAME"),
            self.relocate
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub logging: LoggingConfig,
}

impl Config {
    /// Location of the optional config file in the platform config directory.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "nightingale-relocate")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the configuration, merging the TOML file over the defaults when
    /// one exists. The file is never created. If it fails to parse, defaults
    /// are used.
    pub fn load_config(config_path: Option<&Path>) -> Self {
        let default_config = Config {
            logging: LoggingConfig::default(),
        };

        let figment = match config_path {
            Some(path) => Figment::from(Serialized::defaults(default_config.clone())).merge(Toml::file(path)),
            None => Figment::from(Serialized::defaults(default_config.clone())),
        };

        let mut config: Config = figment.extract().unwrap_or_else(|err| {
            eprintln!(
                "Could not load config file {}: {}. Using default configuration.",
                config_path.map(|p| p.display().to_string()).unwrap_or_default(),
                err
            );
            default_config
        });

        config.ensure_valid();

        config
    }

    /// Loads the configuration once and stores it for the rest of the process.
    pub fn init() -> &'static Config {
        CONFIG.get_or_init(|| Self::load_config(Self::config_path().as_deref()))
    }

    fn ensure_valid(&mut self) {
        self.logging.ensure_valid();
    }
}
