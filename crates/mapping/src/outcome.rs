use sqd_substrate_data::{JsonValue, SubstrateExtrinsic};


/// Tells how the execution of an extrinsic went
pub trait ExecutionOutcome: Send + Sync {
    fn is_success(&self, extrinsic: &SubstrateExtrinsic<'_>) -> bool;

    /// Position of the call at which a batch stopped executing,
    /// `None` when the batch was not interrupted.
    fn batch_interrupted_index(&self, extrinsic: &SubstrateExtrinsic<'_>) -> Option<u32>;
}


/// [ExecutionOutcome] derived from the events emitted while the extrinsic was applied
#[derive(Debug, Copy, Clone, Default)]
pub struct EventOutcome;


impl ExecutionOutcome for EventOutcome {
    fn is_success(&self, extrinsic: &SubstrateExtrinsic<'_>) -> bool {
        !extrinsic.events.iter().any(|event| event.is("System", "ExtrinsicFailed"))
    }

    fn batch_interrupted_index(&self, extrinsic: &SubstrateExtrinsic<'_>) -> Option<u32> {
        extrinsic.events.iter()
            .rev()
            .find(|event| event.is("Utility", "BatchInterrupted"))
            .and_then(|event| interrupted_index(&event.args))
    }
}


// `BatchInterrupted { index, error }` comes either as an object or as a positional list
fn interrupted_index(args: &JsonValue) -> Option<u32> {
    let index = match args {
        JsonValue::Object(fields) => fields.get("index"),
        JsonValue::Array(items) => items.first(),
        _ => None
    }?;
    let index = match index {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None
    }?;
    u32::try_from(index).ok()
}
