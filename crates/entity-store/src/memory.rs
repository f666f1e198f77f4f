use crate::entity::{EntityStore, Name};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;


#[derive(Default)]
pub struct MemoryStore {
    entities: Mutex<BTreeMap<(Name, String), Vec<u8>>>
}


impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.lock().is_empty()
    }

    /// Number of stored records of the given entity type
    pub fn count(&self, entity: Name) -> usize {
        self.entities.lock().keys().filter(|(name, _)| *name == entity).count()
    }
}


#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_bytes(&self, entity: Name, id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let entities = self.entities.lock();
        Ok(entities.get(&(entity, id.to_string())).cloned())
    }

    async fn put_bytes(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<()> {
        self.entities.lock().insert((entity, id.to_string()), value);
        Ok(())
    }

    async fn insert_bytes_if_absent(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<bool> {
        match self.entities.lock().entry((entity, id.to_string())) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(true)
            }
        }
    }
}
