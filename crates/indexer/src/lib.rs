mod ingest;


pub use ingest::{ingest, IngestStats};
