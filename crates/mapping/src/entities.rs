use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqd_entity_store::{Entity, Name};


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrinsicRecord {
    pub id: String,
    pub method: Option<String>,
    pub section: Option<String>,
    pub multisig_call: Option<String>,
    /// JSON array of `{name, type, value}` objects
    pub args: Option<String>,
    pub signer_id: Option<String>,
    pub nonce: Option<u64>,
    pub is_signed: Option<bool>,
    pub timestamp: Option<DateTime<Utc>>,
    pub signature: Option<String>,
    pub tip: Option<u128>,
    pub is_success: Option<bool>,
    pub block_id: Option<String>
}


impl Entity for ExtrinsicRecord {
    const NAME: Name = "Extrinsic";

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: String,
    pub number: Option<u64>,
    pub parent_hash: Option<String>,
    pub timestamp: Option<DateTime<Utc>>
}


impl Entity for BlockRecord {
    const NAME: Name = "Block";

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}
