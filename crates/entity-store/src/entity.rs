use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;


pub type Name = &'static str;


/// Record type that can be kept in an [EntityStore]
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const NAME: Name;

    fn id(&self) -> &str;

    /// Bare record carrying nothing but the id.
    ///
    /// Written by [EntityStoreExt::ensure] when something needs the record to exist
    /// before its contents are known.
    fn placeholder(id: String) -> Self;
}


/// Byte level persistence of entities keyed by entity name and id.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_bytes(&self, entity: Name, id: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Creates or overwrites the value
    async fn put_bytes(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<()>;

    /// Writes the value only if nothing is stored under the key yet.
    ///
    /// Returns `true` when the value was written.
    async fn insert_bytes_if_absent(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<bool>;
}


#[async_trait]
pub trait EntityStoreExt: EntityStore {
    async fn get<E: Entity>(&self, id: &str) -> anyhow::Result<Option<E>> {
        let maybe_bytes = self.get_bytes(E::NAME, id).await?;
        Ok(if let Some(bytes) = maybe_bytes {
            let entity = serde_json::from_slice(&bytes).with_context(|| {
                format!("failed to decode {} {}", E::NAME, id)
            })?;
            Some(entity)
        } else {
            None
        })
    }

    async fn save<E: Entity>(&self, entity: &E) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(entity)?;
        self.put_bytes(E::NAME, entity.id(), bytes).await
    }

    /// Creates a placeholder record unless one with the given id already exists.
    ///
    /// Existing records are never touched. Returns `true` when the placeholder was created.
    async fn ensure<E: Entity>(&self, id: &str) -> anyhow::Result<bool> {
        let bytes = serde_json::to_vec(&E::placeholder(id.to_string()))?;
        self.insert_bytes_if_absent(E::NAME, id, bytes).await
    }
}


impl<S: EntityStore + ?Sized> EntityStoreExt for S {}


pub(crate) fn entity_key(entity: Name, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(entity.len() + 1 + id.len());
    key.extend_from_slice(entity.as_bytes());
    key.push(b'/');
    key.extend_from_slice(id.as_bytes());
    key
}
