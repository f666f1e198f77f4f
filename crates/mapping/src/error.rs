use sqd_substrate_data::ItemIndex;
use std::fmt::{Display, Formatter};


#[derive(Debug)]
pub struct MissingExtrinsicHash {
    pub block_hash: String,
    pub index: ItemIndex
}


impl Display for MissingExtrinsicHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "extrinsic {} of block {} has no hash", self.index, self.block_hash)
    }
}


impl std::error::Error for MissingExtrinsicHash {}


#[derive(Debug)]
pub struct ArgMetadataMismatch {
    pub args: usize,
    pub defs: usize
}


impl Display for ArgMetadataMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "call has {} arguments, but its metadata declares only {}",
            self.args,
            self.defs
        )
    }
}


impl std::error::Error for ArgMetadataMismatch {}


/// Call argument that was expected to hold a call payload, but could not be encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgEncodingError {
    pub index: usize,
    pub name: String,
    pub type_name: String,
    pub message: String
}


impl Display for ArgEncodingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to encode argument {} `{}: {}`: {}",
            self.index,
            self.name,
            self.type_name,
            self.message
        )
    }
}


impl std::error::Error for ArgEncodingError {}
