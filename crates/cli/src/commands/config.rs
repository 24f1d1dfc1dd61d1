//! Chain configuration loading.

use anyhow::{Context, Result};
use powchain_chain::BlockchainConfig;
use std::fs;
use std::path::Path;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub difficulty: Option<usize>,
    pub mining_reward: Option<u64>,
    pub check_balance: bool,
}

/// Load a JSON config file (or the defaults) and apply overrides.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<BlockchainConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => BlockchainConfig::default(),
    };

    if let Some(difficulty) = overrides.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(mining_reward) = overrides.mining_reward {
        config.mining_reward = mining_reward;
    }
    if overrides.check_balance {
        config.check_balance = true;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, BlockchainConfig::default());
    }

    #[test]
    fn test_file_values_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"difficulty": 3, "mining_reward": 50}}"#).unwrap();

        let config = load_config(Some(file.path()), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.mining_reward, 50);
        assert!(!config.check_balance);

        let overrides = ConfigOverrides {
            difficulty: Some(1),
            mining_reward: None,
            check_balance: true,
        };
        let config = load_config(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.difficulty, 1);
        assert_eq!(config.mining_reward, 50);
        assert!(config.check_balance);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(load_config(Some(file.path()), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(load_config(Some(&path), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_excessive_difficulty_rejected() {
        let overrides = ConfigOverrides {
            difficulty: Some(65),
            ..ConfigOverrides::default()
        };
        assert!(load_config(None, &overrides).is_err());
    }
}
