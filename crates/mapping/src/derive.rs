//! Field derivations over a single extrinsic.
//!
//! Every function here is pure: it only reads the borrowed context and can be
//! called in any order and any number of times.

use crate::error::{ArgEncodingError, ArgMetadataMismatch};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqd_substrate_data::{ArgDef, ArgValue, JsonValue, SubstrateExtrinsic};


pub const CALL_ARG_NAME: &str = "call";
pub const OPAQUE_CALL_TYPE: &str = "WrapperKeepOpaque<Call>";
pub const CALL_TYPE: &str = "Call";


/// Extrinsic hash, `None` when absent or empty
pub fn extrinsic_id<'a>(ctx: &SubstrateExtrinsic<'a>) -> Option<&'a str> {
    let extrinsic = ctx.extrinsic;
    extrinsic.hash.as_deref().filter(|hash| !hash.is_empty())
}


pub fn method<'a>(ctx: &SubstrateExtrinsic<'a>) -> &'a str {
    let extrinsic = ctx.extrinsic;
    &extrinsic.call.method
}


pub fn section<'a>(ctx: &SubstrateExtrinsic<'a>) -> &'a str {
    let extrinsic = ctx.extrinsic;
    &extrinsic.call.section
}


/// Pairs call arguments with their declared definitions by position.
///
/// Fails when an argument has no definition. Surplus definitions are ignored.
pub fn call_args<'a>(
    ctx: &SubstrateExtrinsic<'a>
) -> anyhow::Result<impl Iterator<Item = (&'a ArgDef, &'a ArgValue)>>
{
    let extrinsic = ctx.extrinsic;
    let call = &extrinsic.call;
    if call.args.len() > call.meta.args.len() {
        return Err(ArgMetadataMismatch {
            args: call.args.len(),
            defs: call.meta.args.len()
        }.into())
    }
    Ok(call.meta.args.iter().zip(call.args.iter()))
}


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultisigCall {
    /// Hex payload of the last call argument that could be encoded, or empty
    pub payload: String,
    /// Call arguments that were skipped because they could not be encoded
    pub errors: Vec<ArgEncodingError>
}


pub fn is_call_payload(def: &ArgDef) -> bool {
    def.name == CALL_ARG_NAME && (def.type_name == OPAQUE_CALL_TYPE || def.type_name == CALL_TYPE)
}


/// Extracts the payload of a wrapped call, as carried by multisig extrinsics.
///
/// Arguments that fail to encode don't abort the extraction,
/// they are collected into [MultisigCall::errors].
pub fn multisig_call(ctx: &SubstrateExtrinsic<'_>) -> anyhow::Result<MultisigCall> {
    let result = call_args(ctx)?.enumerate().fold(
        MultisigCall::default(),
        |mut acc, (index, (def, value))| {
            if !is_call_payload(def) {
                return acc
            }
            match value.to_hex() {
                Ok(payload) => acc.payload = payload,
                Err(err) => acc.errors.push(ArgEncodingError {
                    index,
                    name: def.name.clone(),
                    type_name: def.type_name.clone(),
                    message: format!("{:#}", err)
                })
            }
            acc
        }
    );
    Ok(result)
}


#[derive(Serialize)]
struct HumanArg<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_name: &'a str,
    value: &'a JsonValue
}


/// JSON array of `{name, type, value}` objects in argument order,
/// where `value` is the human readable rendering of the argument.
pub fn human_args(ctx: &SubstrateExtrinsic<'_>) -> anyhow::Result<String> {
    let args = call_args(ctx)?.map(|(def, value)| HumanArg {
        name: &def.name,
        type_name: &def.type_name,
        value: value.to_human()
    }).collect::<Vec<_>>();
    let json = serde_json::to_string(&args)?;
    Ok(json)
}


pub fn is_signed(ctx: &SubstrateExtrinsic<'_>) -> bool {
    ctx.extrinsic.is_signed
}


pub fn signer<'a>(ctx: &SubstrateExtrinsic<'a>) -> Option<&'a str> {
    let extrinsic = ctx.extrinsic;
    if extrinsic.is_signed {
        extrinsic.signer.as_deref()
    } else {
        None
    }
}


pub fn signature<'a>(ctx: &SubstrateExtrinsic<'a>) -> Option<&'a str> {
    let extrinsic = ctx.extrinsic;
    if extrinsic.is_signed {
        extrinsic.signature.as_deref()
    } else {
        None
    }
}


pub fn nonce(ctx: &SubstrateExtrinsic<'_>) -> u64 {
    ctx.extrinsic.nonce.unwrap_or(0)
}


pub fn tip(ctx: &SubstrateExtrinsic<'_>) -> u128 {
    ctx.extrinsic.tip.unwrap_or(0)
}


pub fn timestamp(ctx: &SubstrateExtrinsic<'_>) -> Option<DateTime<Utc>> {
    ctx.block.timestamp.and_then(DateTime::from_timestamp_millis)
}


pub fn block_hash<'a>(ctx: &SubstrateExtrinsic<'a>) -> &'a str {
    let block = ctx.block;
    &block.hash
}
