use anyhow::Context;
use sqd_entity_store::EntityStore;
use sqd_mapping::{BlockHandler, ExtrinsicHandler, MappingConfig, Persisted};
use sqd_substrate_data::Block;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;


#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub blocks: usize,
    pub extrinsics: usize,
    pub skipped: usize
}


/// Maps every block of a JSON lines stream into the store.
///
/// Blocks and their extrinsics are processed strictly in order.
/// The first error stops the ingestion.
pub async fn ingest<R, S>(reader: R, store: &S, config: &MappingConfig) -> anyhow::Result<IngestStats>
where
    R: AsyncBufRead + Unpin,
    S: EntityStore + ?Sized
{
    let mut stats = IngestStats::default();
    let mut lines = reader.lines();
    let mut line_idx = 0;

    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        line_idx += 1;
        if line.trim().is_empty() {
            continue
        }

        let block: Block = serde_json::from_str(&line).with_context(|| {
            format!("failed to parse block at line {}", line_idx)
        })?;

        process_block(&block, store, config, &mut stats).await.with_context(|| {
            format!("failed to process block {}#{}", block.number(), block.hash())
        })?;
    }

    Ok(stats)
}


async fn process_block<S>(
    block: &Block,
    store: &S,
    config: &MappingConfig,
    stats: &mut IngestStats
) -> anyhow::Result<()>
where
    S: EntityStore + ?Sized
{
    BlockHandler::new(&block.header).save(store).await?;

    for extrinsic in block.extrinsic_contexts() {
        let handler = ExtrinsicHandler::new(extrinsic).with_config(config.clone());
        match handler.persist(store).await? {
            Persisted::Saved(_) => stats.extrinsics += 1,
            Persisted::Skipped => stats.skipped += 1
        }
    }

    stats.blocks += 1;

    debug!(
        block_number = block.number(),
        block_hash = block.hash(),
        extrinsics = block.extrinsics.len(),
        "processed block"
    );

    Ok(())
}
