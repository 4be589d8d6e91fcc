use std::path::Path;

use anyhow::Context;

use crate::{
    compose::ComposeSettings,
    foundation::error::FlowlensResult,
    heatmap::settings::HeatmapSettings,
    mapping::mapper::MapperSettings,
};

/// All tunables, loadable from a (possibly partial) JSON file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub compose: ComposeSettings,
    pub mapper: MapperSettings,
    pub heatmap: HeatmapSettings,
}

impl EngineSettings {
    pub fn from_json(bytes: &[u8]) -> FlowlensResult<Self> {
        let settings: Self = serde_json::from_slice(bytes)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> FlowlensResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json(&bytes)
    }

    pub fn validate(&self) -> FlowlensResult<()> {
        self.compose.validate()?;
        self.heatmap.validate()
    }
}
