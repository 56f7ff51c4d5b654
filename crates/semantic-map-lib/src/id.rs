//! Canonical text keys for element identifiers

use crate::Result;
use crate::proto::GlobalId;

/// Decode raw identifier bytes into the canonical UTF-8 key
#[inline]
pub fn canonicalize(raw: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(raw)?)
}

/// Owned canonical key of a protobuf identifier
#[inline]
pub fn id_as_str(id: &GlobalId) -> Result<String> {
    canonicalize(&id.id).map(str::to_owned)
}
