use anyhow::Context;
use serde::{Deserialize, Serialize};


/// What to do with an extrinsic that has no hash to key its record by
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingHashPolicy {
    /// Return [crate::error::MissingExtrinsicHash]
    #[default]
    Fail,
    /// Log a warning and write nothing
    Skip
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MappingConfig {
    #[serde(default)]
    pub missing_hash: MissingHashPolicy
}


impl MappingConfig {
    pub fn read(file: &str) -> anyhow::Result<Self> {
        let reader = std::io::BufReader::new(
            std::fs::File::open(file).with_context(|| format!("failed to open {}", file))?
        );
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
