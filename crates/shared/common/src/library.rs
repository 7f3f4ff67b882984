//! Library link ids and bytecode linking.
//!
//! solc leaves a 40 character placeholder in creation bytecode wherever a
//! contract calls into an external library. The placeholder is `__$`, the
//! first 34 hex characters of `keccak256(fully_qualified_name)`, then `$__`.

use alloy_primitives::{Address, Bytes, hex, keccak256};

use crate::LinkError;

/// Length of a library placeholder, equal to the hex length of an address.
pub const LINK_ID_LEN: usize = 40;

const PLACEHOLDER_PREFIX: &str = "__$";
const PLACEHOLDER_SUFFIX: &str = "$__";
const HASH_PREFIX_LEN: usize = 34;

/// Derives the bytecode placeholder for a library.
///
/// `library_name` must be fully qualified, e.g. `contracts/lib/Math.sol:Math`.
pub fn convert_library_name_to_link_id(library_name: &str) -> Result<String, LinkError> {
    if !library_name.contains(".sol:") {
        return Err(LinkError::NotFullyQualified(library_name.to_string()));
    }
    let hashed = hex::encode(keccak256(library_name.as_bytes()));
    Ok(format!("{PLACEHOLDER_PREFIX}{}{PLACEHOLDER_SUFFIX}", &hashed[..HASH_PREFIX_LEN]))
}

/// Replaces library placeholders in hex `bytecode` and decodes the result.
///
/// Each entry pairs a fully qualified library name with its deployed address.
/// Fails if any placeholder is left once every library has been substituted.
pub fn link_bytecode<'a>(
    bytecode: &str,
    libraries: impl IntoIterator<Item = (&'a str, Address)>,
) -> Result<Bytes, LinkError> {
    let mut linked = bytecode.to_string();
    for (name, address) in libraries {
        let link_id = convert_library_name_to_link_id(name)?;
        linked = linked.replace(&link_id, &hex::encode(address));
    }

    if let Some(start) = linked.find(PLACEHOLDER_PREFIX) {
        let rest = &linked[start..];
        let placeholder = rest.get(..LINK_ID_LEN).unwrap_or(rest);
        return Err(LinkError::Unlinked(placeholder.to_string()));
    }

    hex::decode(&linked).map(Bytes::from).map_err(|e| LinkError::InvalidHex(e.to_string()))
}
