use crate::entity::{entity_key, EntityStore, Name};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options as RocksOptions};
use std::path::Path;
use std::sync::Arc;


const CF_ENTITIES: Name = "ENTITIES";


type RocksDB = rocksdb::OptimisticTransactionDB;


#[derive(Debug, Clone)]
pub struct StoreSettings {
    cache_size: usize
}


impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            cache_size: 256
        }
    }
}


impl StoreSettings {
    /// Block cache size in megabytes
    pub fn with_cache_size(mut self, mb: usize) -> Self {
        self.cache_size = mb;
        self
    }

    pub fn open(&self, path: impl AsRef<Path>) -> anyhow::Result<RocksStore> {
        let mut options = RocksOptions::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        options.set_wal_compression_type(rocksdb::DBCompressionType::Zstd);

        let cache = rocksdb::Cache::new_lru_cache(self.cache_size * 1024 * 1024);
        let mut block_based_table_factory = rocksdb::BlockBasedOptions::default();
        block_based_table_factory.set_block_cache(&cache);
        options.set_block_based_table_factory(&block_based_table_factory);

        let db = RocksDB::open_cf_descriptors(&options, path, [
            ColumnFamilyDescriptor::new(CF_ENTITIES, {
                let mut options = RocksOptions::default();
                options.set_compression_type(rocksdb::DBCompressionType::Lz4);
                options
            })
        ])?;

        Ok(RocksStore {
            db: Arc::new(db)
        })
    }
}


/// [EntityStore] backed by a RocksDB database
#[derive(Clone)]
pub struct RocksStore {
    db: Arc<RocksDB>
}


impl RocksStore {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        StoreSettings::default().open(path)
    }

    async fn run<R, F>(&self, cb: F) -> anyhow::Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&RocksDB) -> anyhow::Result<R> + Send + 'static
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || cb(&db))
            .await
            .context("rocksdb task panicked")?
    }
}


fn cf_entities(db: &RocksDB) -> anyhow::Result<&ColumnFamily> {
    db.cf_handle(CF_ENTITIES).ok_or_else(|| anyhow!("column family {} not found", CF_ENTITIES))
}


// Optimistic transactions report a write conflict at commit time as `Busy`.
fn is_conflict(err: &rocksdb::Error) -> bool {
    matches!(err.kind(), rocksdb::ErrorKind::Busy | rocksdb::ErrorKind::TryAgain)
}


fn insert_if_absent(db: &RocksDB, key: &[u8], value: &[u8]) -> anyhow::Result<bool> {
    let cf = cf_entities(db)?;
    loop {
        let tx = db.transaction();
        if tx.get_pinned_for_update_cf(cf, key, true)?.is_some() {
            return Ok(false)
        }
        tx.put_cf(cf, key, value)?;
        match tx.commit() {
            Ok(_) => return Ok(true),
            Err(err) if is_conflict(&err) => {},
            Err(err) => return Err(err.into())
        }
    }
}


#[async_trait]
impl EntityStore for RocksStore {
    async fn get_bytes(&self, entity: Name, id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let key = entity_key(entity, id);
        self.run(move |db| {
            let value = db.get_cf(cf_entities(db)?, &key)?;
            Ok(value)
        }).await
    }

    async fn put_bytes(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<()> {
        let key = entity_key(entity, id);
        self.run(move |db| {
            db.put_cf(cf_entities(db)?, &key, &value)?;
            Ok(())
        }).await
    }

    async fn insert_bytes_if_absent(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<bool> {
        let key = entity_key(entity, id);
        self.run(move |db| insert_if_absent(db, &key, &value)).await
    }
}
