use serde::Deserialize;

use stacker_api::BlockSize;

use crate::error::EngineError;
use crate::input::Layout;

/// Root configuration, parsed from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockConfig {
    /// Records per block. Unset means one block per partition.
    #[serde(default)]
    pub block_size: Option<i64>,

    /// Number of partitions the input is split into.
    #[serde(default = "default_partitions")]
    pub partitions: usize,

    /// How input lines map onto records.
    #[serde(default)]
    pub layout: Layout,
}

fn default_partitions() -> usize {
    4
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_size: None,
            partitions: default_partitions(),
            layout: Layout::default(),
        }
    }
}

impl BlockConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.partitions == 0 {
            return Err(EngineError::Config("partitions must be at least 1".into()));
        }
        self.block_size()?;
        Ok(())
    }

    /// Validated block size.
    pub fn block_size(&self) -> Result<Option<BlockSize>, EngineError> {
        Ok(self.block_size.map(BlockSize::try_from).transpose()?)
    }
}
