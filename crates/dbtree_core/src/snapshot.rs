use crate::TreeError;
use crate::entity::{DataSource, Entity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Entities and data sources as handed over by the data-loading layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub data_sources: Vec<DataSource>,

    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Snapshot {
    pub fn from_json(content: &str) -> Result<Self, TreeError> {
        serde_json::from_str(content).map_err(|e| TreeError::InvalidSnapshot(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, TreeError> {
        let content = fs::read_to_string(path).map_err(TreeError::IoError)?;
        let snapshot = Self::from_json(&content)?;

        log::info!(
            "Loaded snapshot with {} databases and {} data sources",
            snapshot.entities.len(),
            snapshot.data_sources.len()
        );
        Ok(snapshot)
    }
}
