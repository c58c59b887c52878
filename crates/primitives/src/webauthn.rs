//! Passkey (WebAuthn) public key material

use ethers::{
    types::{Bytes, H256, U256},
    utils::keccak256,
};
use serde::{Deserialize, Serialize};

/// Public half of a passkey credential, as registered with the WebAuthn validator
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAuthnKey {
    /// X coordinate of the P-256 public key
    pub pub_x: U256,
    /// Y coordinate of the P-256 public key
    pub pub_y: U256,
    /// Keccak hash of the raw credential id (identifies the authenticator on chain)
    pub auth_id_hash: H256,
    /// Raw credential id
    pub credential_id: Bytes,
}

impl WebAuthnKey {
    pub fn new(pub_x: U256, pub_y: U256, credential_id: Bytes) -> Self {
        let auth_id_hash = keccak256(&credential_id).into();
        Self { pub_x, pub_y, auth_id_hash, credential_id }
    }

    /// Builds the key from the big-endian affine coordinates
    pub fn from_coordinates(x: &[u8], y: &[u8], credential_id: Bytes) -> Self {
        Self::new(U256::from_big_endian(x), U256::from_big_endian(y), credential_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_id_hash_is_keccak_of_credential_id() {
        let key = WebAuthnKey::new(1.into(), 2.into(), Bytes::default());
        assert_eq!(
            key.auth_id_hash,
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470".parse().unwrap()
        );
    }
}
