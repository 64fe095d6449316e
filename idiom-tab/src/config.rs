//! Configuration for idiom-tab.
//!
//! CLI arguments and environment variable handling using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::cli::Commands;

/// Supply mode the session runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyMode {
    /// Rotation cache fed by the generation API
    Generative,
    /// Bundled static dataset only
    Static,
}

/// idiom-tab - one foreign-language idiom per new tab
#[derive(Parser, Debug, Clone)]
#[command(name = "idiom-tab")]
#[command(about = "Foreign-language idiom engine for a new-tab page")]
pub struct Args {
    /// Directory holding the persisted state file
    #[arg(long, env = "IDIOM_DATA_DIR", default_value = ".idiom-tab")]
    pub data_dir: PathBuf,

    /// Generation API key (overrides the stored credential)
    #[arg(long, env = "GEMINI_API_KEY")]
    pub api_key: Option<String>,

    /// Supply mode: "generative" or "static"
    #[arg(long, env = "IDIOM_MODE", default_value = "generative")]
    pub mode: String,

    /// Model identifier for the generation API
    #[arg(long, env = "IDIOM_MODEL", default_value = "gemini-2.0-flash")]
    pub model: String,

    /// Generation API base URL override (proxies, local mocks)
    #[arg(long, env = "IDIOM_API_URL")]
    pub api_url: Option<String>,

    /// Rotation cache capacity
    #[arg(long, env = "IDIOM_CACHE_CAPACITY", default_value = "100")]
    pub cache_capacity: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Subcommand; with none given, an interactive session starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// Parsed supply mode.
    pub fn supply_mode(&self) -> SupplyMode {
        match self.mode.as_str() {
            "static" => SupplyMode::Static,
            _ => SupplyMode::Generative,
        }
    }

    /// Path of the JSON state file inside the data directory.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.mode != "generative" && self.mode != "static" {
            return Err(format!(
                "IDIOM_MODE must be \"generative\" or \"static\", got \"{}\"",
                self.mode
            ));
        }
        if self.cache_capacity == 0 {
            return Err("IDIOM_CACHE_CAPACITY must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["idiom-tab"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.supply_mode(), SupplyMode::Generative);
        assert_eq!(args.cache_capacity, 100);
        assert_eq!(args.model, "gemini-2.0-flash");
        assert!(args.command.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_static_mode() {
        let args = args(&["--mode", "static"]);
        assert_eq!(args.supply_mode(), SupplyMode::Static);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(args(&["--mode", "telepathic"]).validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(args(&["--cache-capacity", "0"]).validate().is_err());
    }

    #[test]
    fn test_state_path_under_data_dir() {
        let args = args(&["--data-dir", "/tmp/idioms"]);
        assert_eq!(args.state_path(), PathBuf::from("/tmp/idioms/state.json"));
    }
}
