use crate::block::BlockHandler;
use crate::config::{MappingConfig, MissingHashPolicy};
use crate::derive;
use crate::entities::ExtrinsicRecord;
use crate::error::MissingExtrinsicHash;
use crate::outcome::{EventOutcome, ExecutionOutcome};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqd_entity_store::{EntityStore, EntityStoreExt};
use sqd_substrate_data::SubstrateExtrinsic;
use tracing::{debug, error, warn};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    /// Record was written under the given id
    Saved(String),
    /// Extrinsic had no hash and [MissingHashPolicy::Skip] is in effect
    Skipped
}


/// Maps a single extrinsic to an [ExtrinsicRecord]
pub struct ExtrinsicHandler<'a, O = EventOutcome> {
    extrinsic: SubstrateExtrinsic<'a>,
    outcome: O,
    config: MappingConfig
}


impl<'a> ExtrinsicHandler<'a> {
    pub fn new(extrinsic: SubstrateExtrinsic<'a>) -> Self {
        Self {
            extrinsic,
            outcome: EventOutcome,
            config: MappingConfig::default()
        }
    }

    /// Makes sure an extrinsic record with the given id exists.
    ///
    /// Creates a placeholder holding nothing but the id if there is no record yet.
    /// An existing record is never modified. Returns `true` when the placeholder was created.
    pub async fn ensure_extrinsic<S>(store: &S, id: &str) -> anyhow::Result<bool>
    where
        S: EntityStore + ?Sized
    {
        store.ensure::<ExtrinsicRecord>(id).await.with_context(|| {
            format!("failed to ensure extrinsic {}", id)
        })
    }
}


impl<'a, O: ExecutionOutcome> ExtrinsicHandler<'a, O> {
    pub fn with_outcome<P: ExecutionOutcome>(self, outcome: P) -> ExtrinsicHandler<'a, P> {
        ExtrinsicHandler {
            extrinsic: self.extrinsic,
            outcome,
            config: self.config
        }
    }

    pub fn with_config(mut self, config: MappingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn extrinsic(&self) -> &SubstrateExtrinsic<'a> {
        &self.extrinsic
    }

    pub fn id(&self) -> Option<&'a str> {
        derive::extrinsic_id(&self.extrinsic)
    }

    pub fn method(&self) -> &'a str {
        derive::method(&self.extrinsic)
    }

    pub fn section(&self) -> &'a str {
        derive::section(&self.extrinsic)
    }

    /// Hex payload of the wrapped call, or an empty string.
    ///
    /// Arguments that can't be encoded are logged and skipped.
    pub fn multisig_call(&self) -> anyhow::Result<String> {
        let multisig = derive::multisig_call(&self.extrinsic)?;
        for err in multisig.errors.iter() {
            error!(
                extrinsic_hash = self.id(),
                arg_index = err.index,
                arg_name = %err.name,
                arg_type = %err.type_name,
                error = %err.message,
                "failed to encode multisig call"
            );
        }
        Ok(multisig.payload)
    }

    pub fn args(&self) -> anyhow::Result<String> {
        derive::human_args(&self.extrinsic)
    }

    pub fn signer(&self) -> Option<&'a str> {
        derive::signer(&self.extrinsic)
    }

    pub fn nonce(&self) -> u64 {
        derive::nonce(&self.extrinsic)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        derive::timestamp(&self.extrinsic)
    }

    pub fn block_hash(&self) -> &'a str {
        derive::block_hash(&self.extrinsic)
    }

    pub fn is_signed(&self) -> bool {
        derive::is_signed(&self.extrinsic)
    }

    pub fn signature(&self) -> Option<&'a str> {
        derive::signature(&self.extrinsic)
    }

    pub fn tip(&self) -> u128 {
        derive::tip(&self.extrinsic)
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success(&self.extrinsic)
    }

    pub fn batch_interrupted_index(&self) -> Option<u32> {
        self.outcome.batch_interrupted_index(&self.extrinsic)
    }

    fn missing_hash(&self) -> MissingExtrinsicHash {
        MissingExtrinsicHash {
            block_hash: self.block_hash().to_string(),
            index: self.extrinsic.extrinsic.index
        }
    }

    pub fn record(&self) -> anyhow::Result<ExtrinsicRecord> {
        let id = self.id().ok_or_else(|| self.missing_hash())?;
        Ok(ExtrinsicRecord {
            id: id.to_string(),
            method: Some(self.method().to_string()),
            section: Some(self.section().to_string()),
            multisig_call: Some(self.multisig_call()?),
            args: Some(self.args()?),
            signer_id: self.signer().map(str::to_string),
            nonce: Some(self.nonce()),
            is_signed: Some(self.is_signed()),
            timestamp: self.timestamp(),
            signature: self.signature().map(str::to_string),
            tip: Some(self.tip()),
            is_success: Some(self.is_success()),
            block_id: Some(self.block_hash().to_string())
        })
    }

    /// Writes the extrinsic record, making sure the block it refers to exists first.
    pub async fn persist<S>(&self, store: &S) -> anyhow::Result<Persisted>
    where
        S: EntityStore + ?Sized
    {
        let Some(id) = self.id() else {
            return match self.config.missing_hash {
                MissingHashPolicy::Fail => Err(self.missing_hash().into()),
                MissingHashPolicy::Skip => {
                    warn!(
                        block_hash = self.block_hash(),
                        index = self.extrinsic.extrinsic.index,
                        "skipping extrinsic without hash"
                    );
                    Ok(Persisted::Skipped)
                }
            }
        };

        BlockHandler::ensure_block(store, self.block_hash()).await?;

        let record = self.record()
            .with_context(|| format!("failed to map extrinsic {}", id))?;

        store.save(&record).await.with_context(|| {
            format!("failed to save extrinsic {}", id)
        })?;

        debug!(
            extrinsic_hash = id,
            section = self.section(),
            method = self.method(),
            "saved extrinsic"
        );

        Ok(Persisted::Saved(id.to_string()))
    }
}
