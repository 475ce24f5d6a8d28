//! Run configuration shared by the CLI commands

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result, dqn::DqnAgentConfig, pipeline::TrainingConfig, q_learning::QAgentConfig,
};

/// Everything a command needs to build and train agents
///
/// Every section may be left out of a config file, in which case its
/// defaults apply. Command-line flags are applied on top afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Tabular agent hyperparameters
    pub q: QAgentConfig,

    /// Neural agent hyperparameters
    pub dqn: DqnAgentConfig,

    /// Rounds, seed and exploration schedule
    pub training: TrainingConfig,
}

impl RunConfig {
    /// Read a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create config file {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.q.validate()?;
        self.dqn.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"q": {"learning_rate": 0.5}, "training": {"seed": 7}}"#)
                .unwrap();
        assert_eq!(config.q.learning_rate, 0.5);
        assert_eq!(config.q.explore_chance, 0.1);
        assert_eq!(config.training.seed, Some(7));
        assert_eq!(config.training.num_rounds, 1000);
        assert_eq!(config.dqn, DqnAgentConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut config = RunConfig::default();
        config.training.num_rounds = 42;
        config.dqn.hidden_size = Some(12);
        config.save(&path).unwrap();

        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = RunConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = RunConfig::default();
        assert!(config.validate().is_ok());
        config.dqn.explore_chance = 1.5;
        assert!(config.validate().is_err());
    }
}
