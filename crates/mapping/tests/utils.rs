#![allow(dead_code)]
use anyhow::bail;
use async_trait::async_trait;
use parking_lot::Mutex;
use sqd_entity_store::{EntityStore, MemoryStore, Name};
use sqd_substrate_data::{ArgDef, ArgValue, Block, BlockHeader, Call, CallMeta, Event, Extrinsic, JsonValue, Phase};


pub const BLOCK_HASH: &str = "0xb10c";
pub const EXTRINSIC_HASH: &str = "0xe0";
pub const BLOCK_TIMESTAMP: i64 = 1_650_000_000_000;


pub fn arg(name: &str, type_name: &str, encoded: Option<&str>, human: JsonValue) -> (ArgDef, ArgValue) {
    let def = ArgDef {
        name: name.to_string(),
        type_name: type_name.to_string()
    };
    let value = ArgValue {
        encoded: encoded.map(str::to_string),
        human
    };
    (def, value)
}


pub fn make_extrinsic(section: &str, method: &str, args: Vec<(ArgDef, ArgValue)>) -> Extrinsic {
    let (defs, values) = args.into_iter().unzip();
    Extrinsic {
        index: 0,
        hash: Some(EXTRINSIC_HASH.to_string()),
        call: Call {
            section: section.to_string(),
            method: method.to_string(),
            args: values,
            meta: CallMeta {
                args: defs
            }
        },
        signer: Some("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".to_string()),
        nonce: Some(3),
        tip: Some(1_000),
        signature: Some("0x5151".to_string()),
        is_signed: true
    }
}


pub fn make_event(index: u32, section: &str, method: &str, args: JsonValue) -> Event {
    Event {
        index,
        section: section.to_string(),
        method: method.to_string(),
        args,
        phase: Phase::ApplyExtrinsic,
        extrinsic_index: Some(0)
    }
}


pub fn make_block(extrinsic: Extrinsic, events: Vec<Event>) -> Block {
    Block {
        header: BlockHeader {
            hash: BLOCK_HASH.to_string(),
            parent_hash: "0xb10b".to_string(),
            height: 100,
            timestamp: Some(BLOCK_TIMESTAMP)
        },
        extrinsics: vec![extrinsic],
        events
    }
}


/// Memory store that remembers the order of operations
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    ops: Mutex<Vec<String>>
}


impl RecordingStore {
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().clone()
    }

    fn record(&self, op: &str, entity: Name, id: &str) {
        self.ops.lock().push(format!("{} {} {}", op, entity, id))
    }
}


#[async_trait]
impl EntityStore for RecordingStore {
    async fn get_bytes(&self, entity: Name, id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.record("get", entity, id);
        self.inner.get_bytes(entity, id).await
    }

    async fn put_bytes(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<()> {
        self.record("put", entity, id);
        self.inner.put_bytes(entity, id, value).await
    }

    async fn insert_bytes_if_absent(&self, entity: Name, id: &str, value: Vec<u8>) -> anyhow::Result<bool> {
        self.record("ensure", entity, id);
        self.inner.insert_bytes_if_absent(entity, id, value).await
    }
}


/// Store that accepts block placeholders, but rejects every write
pub struct FailingStore;


#[async_trait]
impl EntityStore for FailingStore {
    async fn get_bytes(&self, _entity: Name, _id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn put_bytes(&self, _entity: Name, _id: &str, _value: Vec<u8>) -> anyhow::Result<()> {
        bail!("disk is full")
    }

    async fn insert_bytes_if_absent(&self, _entity: Name, _id: &str, _value: Vec<u8>) -> anyhow::Result<bool> {
        Ok(true)
    }
}
