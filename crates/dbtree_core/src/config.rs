use crate::TreeError;
use crate::entity::GroupingMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// How long the navigator waits after expanding each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDelays {
    /// Wait for nodes that are already loaded, or exist only in the UI.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Wait for nodes whose children still have to be fetched.
    #[serde(default = "default_load_ms")]
    pub load_ms: u64,
}

fn default_settle_ms() -> u64 {
    500
}

fn default_load_ms() -> u64 {
    1300
}

impl Default for NavigationDelays {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            load_ms: default_load_ms(),
        }
    }
}

impl NavigationDelays {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn load(&self) -> Duration {
        Duration::from_millis(self.load_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    #[serde(default)]
    pub grouping_mode: GroupingMode,

    #[serde(default)]
    pub navigation: NavigationDelays,
}

pub struct TreeConfigStore {
    path: PathBuf,
}

impl TreeConfigStore {
    pub fn new() -> Result<Self, TreeError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            TreeError::IoError(std::io::Error::other("Could not find config directory"))
        })?;

        let app_dir = config_dir.join("dbtree");
        fs::create_dir_all(&app_dir).map_err(TreeError::IoError)?;

        Ok(Self {
            path: app_dir.join("config.json"),
        })
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<TreeConfig, TreeError> {
        if !self.path.exists() {
            return Ok(TreeConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(TreeError::IoError)?;
        let config: TreeConfig =
            serde_json::from_str(&content).map_err(|e| TreeError::InvalidConfig(e.to_string()))?;

        Ok(config)
    }

    pub fn save(&self, config: &TreeConfig) -> Result<(), TreeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(TreeError::IoError)?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| TreeError::InvalidConfig(e.to_string()))?;
        fs::write(&self.path, content).map_err(TreeError::IoError)?;

        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
