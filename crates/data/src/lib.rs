mod hex;
mod model;
pub mod serde;


pub use hex::{decode_hex, encode_hex};
pub use model::*;
