// Configuration module for reading Snake.toml
// Tunable heuristic thresholds, appearance and diagnostics settings

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub heuristic: HeuristicConfig,
    #[serde(default)]
    pub maze: MazeConfig,
    pub debug: DebugConfig,
}

/// Agent metadata returned from `GET /` and `/start`
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Shortcut ("cutting") thresholds for the move selector
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicConfig {
    /// Slack kept between the head and our own tail after any shortcut
    pub safety_margin: i32,
    /// Below this fraction of free cells the snake follows the tour strictly
    pub crowding_fraction: f64,
    /// Budget reduction when food lies ahead of the tail (eating grows us)
    pub food_growth_allowance: i32,
    /// Tail-to-food gap, as a fraction of free cells, above which the excess is subtracted
    pub gap_penalty_fraction: f64,
}

/// Maze generation settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MazeConfig {
    /// Fixed seed for every game; a fresh random seed per game when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
    pub dump_dir: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            appearance: AppearanceConfig {
                apiversion: "1".to_string(),
                author: "hamiltonian-snake".to_string(),
                color: "#DFFF00".to_string(),
                head: "dead".to_string(),
                tail: "bolt".to_string(),
            },
            heuristic: HeuristicConfig {
                safety_margin: 3,
                crowding_fraction: 0.5,
                food_growth_allowance: 1,
                gap_penalty_fraction: 0.5,
            },
            maze: MazeConfig { seed: None },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "hamiltonian_debug.jsonl".to_string(),
                dump_dir: "dumps".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
