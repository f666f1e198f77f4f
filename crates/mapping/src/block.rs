use crate::entities::BlockRecord;
use anyhow::Context;
use chrono::DateTime;
use sqd_entity_store::{EntityStore, EntityStoreExt};
use sqd_substrate_data::BlockHeader;
use tracing::debug;


pub struct BlockHandler<'a> {
    header: &'a BlockHeader
}


impl<'a> BlockHandler<'a> {
    pub fn new(header: &'a BlockHeader) -> Self {
        Self {
            header
        }
    }

    /// Makes sure a block record with the given hash exists,
    /// creating a bare one if needed. Existing records are left untouched.
    pub async fn ensure_block<S>(store: &S, id: &str) -> anyhow::Result<()>
    where
        S: EntityStore + ?Sized
    {
        let created = store.ensure::<BlockRecord>(id).await.with_context(|| {
            format!("failed to ensure block {}", id)
        })?;
        if created {
            debug!(block_hash = id, "created block placeholder");
        }
        Ok(())
    }

    pub fn record(&self) -> BlockRecord {
        BlockRecord {
            id: self.header.hash.clone(),
            number: Some(self.header.height),
            parent_hash: Some(self.header.parent_hash.clone()),
            timestamp: self.header.timestamp.and_then(DateTime::from_timestamp_millis)
        }
    }

    /// Writes the full block record, replacing a placeholder if there is one
    pub async fn save<S>(&self, store: &S) -> anyhow::Result<()>
    where
        S: EntityStore + ?Sized
    {
        store.save(&self.record()).await.with_context(|| {
            format!("failed to save block {}#{}", self.header.height, self.header.hash)
        })
    }
}
