mod block;
mod config;
pub mod derive;
mod entities;
pub mod error;
mod extrinsic;
mod outcome;


pub use block::BlockHandler;
pub use config::{MappingConfig, MissingHashPolicy};
pub use entities::{BlockRecord, ExtrinsicRecord};
pub use extrinsic::{ExtrinsicHandler, Persisted};
pub use outcome::{EventOutcome, ExecutionOutcome};
