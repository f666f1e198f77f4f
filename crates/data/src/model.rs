use crate::hex::{decode_hex, encode_hex};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;


pub use serde_json::Value as JsonValue;


pub type BlockNumber = u64;
pub type ItemIndex = u32;


#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub hash: String,
    pub parent_hash: String,
    pub height: BlockNumber,
    /// Unix time in milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>
}


/// Declared name and type of a call argument
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArgDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String
}


#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallMeta {
    #[serde(default)]
    pub args: Vec<ArgDef>
}


/// Decoded call argument.
///
/// `encoded` holds the SCALE encoding of the native value as hex,
/// `human` is the human readable rendering produced by the runtime.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArgValue {
    #[serde(default)]
    pub encoded: Option<String>,
    #[serde(default)]
    pub human: JsonValue
}


impl ArgValue {
    pub fn to_hex(&self) -> anyhow::Result<String> {
        let encoded = self.encoded.as_ref().ok_or_else(|| {
            anyhow!("argument has no encoded value")
        })?;
        let bytes = decode_hex(encoded)?;
        Ok(encode_hex(&bytes))
    }

    pub fn to_human(&self) -> &JsonValue {
        &self.human
    }
}


#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Call {
    pub section: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<ArgValue>,
    #[serde(default)]
    pub meta: CallMeta
}


#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extrinsic {
    pub index: ItemIndex,
    #[serde(default)]
    pub hash: Option<String>,
    pub call: Call,
    #[serde(default)]
    pub signer: Option<String>,
    #[serde(deserialize_with = "crate::serde::decode_lenient_option", default)]
    pub nonce: Option<u64>,
    #[serde(deserialize_with = "crate::serde::decode_lenient_option", default)]
    pub tip: Option<u128>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub is_signed: bool
}


#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Phase {
    Initialization,
    ApplyExtrinsic,
    Finalization,
}


#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub index: ItemIndex,
    pub section: String,
    pub method: String,
    #[serde(default)]
    pub args: JsonValue,
    pub phase: Phase,
    #[serde(default)]
    pub extrinsic_index: Option<ItemIndex>
}


impl Event {
    pub fn is(&self, section: &str, method: &str) -> bool {
        self.section.eq_ignore_ascii_case(section) && self.method.eq_ignore_ascii_case(method)
    }
}


#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub header: BlockHeader,
    #[serde(default)]
    pub extrinsics: Vec<Extrinsic>,
    #[serde(default)]
    pub events: Vec<Event>
}


impl Block {
    pub fn number(&self) -> BlockNumber {
        self.header.height
    }

    pub fn hash(&self) -> &str {
        &self.header.hash
    }

    /// Pairs every extrinsic with its block header and the events
    /// emitted while it was applied.
    pub fn extrinsic_contexts(&self) -> impl Iterator<Item = SubstrateExtrinsic<'_>> + '_ {
        let mut events_by_extrinsic: HashMap<ItemIndex, Vec<&Event>> = HashMap::new();
        for event in self.events.iter().filter(|event| event.phase == Phase::ApplyExtrinsic) {
            if let Some(index) = event.extrinsic_index {
                events_by_extrinsic.entry(index).or_default().push(event);
            }
        }

        self.extrinsics.iter().map(move |extrinsic| {
            let events = events_by_extrinsic.get(&extrinsic.index).cloned().unwrap_or_default();
            SubstrateExtrinsic::new(&self.header, extrinsic, events)
        })
    }
}


/// Extrinsic together with the block it was included in.
#[derive(Debug, Clone)]
pub struct SubstrateExtrinsic<'a> {
    pub block: &'a BlockHeader,
    pub extrinsic: &'a Extrinsic,
    pub events: Vec<&'a Event>
}


impl<'a> SubstrateExtrinsic<'a> {
    pub fn new(block: &'a BlockHeader, extrinsic: &'a Extrinsic, events: Vec<&'a Event>) -> Self {
        Self {
            block,
            extrinsic,
            events
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{ArgValue, Block};
    use serde_json::json;


    #[test]
    fn test_arg_to_hex() {
        let arg = ArgValue {
            encoded: Some("0xDEADbeef".to_string()),
            human: json!("call")
        };
        assert_eq!(arg.to_hex().unwrap(), "0xdeadbeef");

        let arg = ArgValue {
            encoded: None,
            human: json!(1)
        };
        assert!(arg.to_hex().is_err());
    }

    #[test]
    fn test_extrinsic_contexts() {
        let block: Block = serde_json::from_value(json!({
            "header": {
                "hash": "0xb1",
                "parentHash": "0xb0",
                "height": 10,
                "timestamp": 1700000000000i64
            },
            "extrinsics": [
                {"index": 0, "hash": "0xe0", "call": {"section": "timestamp", "method": "set"}},
                {"index": 1, "hash": "0xe1", "call": {"section": "balances", "method": "transfer"}, "nonce": "5"}
            ],
            "events": [
                {"index": 0, "section": "system", "method": "ExtrinsicSuccess", "phase": "ApplyExtrinsic", "extrinsicIndex": 0},
                {"index": 1, "section": "balances", "method": "Transfer", "phase": "ApplyExtrinsic", "extrinsicIndex": 1},
                {"index": 2, "section": "system", "method": "ExtrinsicSuccess", "phase": "ApplyExtrinsic", "extrinsicIndex": 1},
                {"index": 3, "section": "treasury", "method": "Deposit", "phase": "Finalization"}
            ]
        })).unwrap();

        let contexts: Vec<_> = block.extrinsic_contexts().collect();
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].events.len(), 1);
        assert_eq!(contexts[1].events.iter().map(|e| e.index).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(contexts[1].extrinsic.nonce, Some(5));
        assert_eq!(contexts[1].block.hash, "0xb1");
        assert!(!contexts[1].extrinsic.is_signed);
    }

    #[test]
    fn test_interleaved_events_keep_order() {
        let block: Block = serde_json::from_value(json!({
            "header": {"hash": "0xb2", "parentHash": "0xb1", "height": 11},
            "extrinsics": [
                {"index": 0, "call": {"section": "timestamp", "method": "set"}},
                {"index": 1, "call": {"section": "utility", "method": "batch"}},
                {"index": 2, "call": {"section": "balances", "method": "transfer"}}
            ],
            "events": [
                {"index": 0, "section": "system", "method": "NewAccount", "phase": "Initialization"},
                {"index": 1, "section": "utility", "method": "ItemCompleted", "phase": "ApplyExtrinsic", "extrinsicIndex": 1},
                {"index": 2, "section": "system", "method": "ExtrinsicSuccess", "phase": "ApplyExtrinsic", "extrinsicIndex": 0},
                {"index": 3, "section": "utility", "method": "BatchCompleted", "phase": "ApplyExtrinsic", "extrinsicIndex": 1},
                {"index": 4, "section": "system", "method": "ExtrinsicSuccess", "phase": "ApplyExtrinsic", "extrinsicIndex": 1},
                {"index": 5, "section": "system", "method": "Stray", "phase": "Finalization", "extrinsicIndex": 2}
            ]
        })).unwrap();

        let indexes: Vec<Vec<u32>> = block.extrinsic_contexts()
            .map(|ctx| ctx.events.iter().map(|e| e.index).collect())
            .collect();

        assert_eq!(indexes, vec![vec![2], vec![1, 3, 4], vec![]]);
    }
}
