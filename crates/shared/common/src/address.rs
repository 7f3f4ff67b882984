//! Random addresses for test fixtures.

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;

/// Returns the address of a freshly generated private key.
///
/// The key is discarded, so nothing can ever sign for the address.
pub fn get_random_address() -> Address {
    PrivateKeySigner::random().address()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_address_is_checksummed_hex() {
        let rendered = get_random_address().to_checksum(None);
        assert_eq!(rendered.len(), 42);
        assert!(rendered.starts_with("0x"));
        assert!(rendered[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(rendered.parse::<Address>().unwrap().to_checksum(None), rendered);
    }

    #[test]
    fn test_random_addresses_differ() {
        let first = get_random_address();
        let second = get_random_address();
        assert_ne!(first, second);
        assert_ne!(first, Address::ZERO);
    }
}
