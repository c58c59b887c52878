//! Signer for the Kernel WebAuthn validator

use crate::{
    authenticator::Authenticator,
    error::PasskeyError,
    key::{b64_decode, b64url_encode},
    types::{PublicKeyCredentialDescriptor, RequestOptions, CLIENT_DATA_GET},
};
use ethers::{
    abi::{encode, Token},
    types::{Address, Bytes, H256, U256},
};
use p256::ecdsa::Signature;
use sigil_primitives::WebAuthnKey;
use std::sync::Arc;
use tracing::debug;

/// Order of the P-256 curve
pub const P256_N: U256 = U256([
    0xF3B9_CAC2_FC63_2551,
    0xBCE6_FAAD_A717_9E84,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_0000_0000,
]);

const DUMMY_AUTHENTICATOR_DATA: [u8; 37] = [
    0x49, 0x96, 0x0d, 0xe5, 0x88, 0x0e, 0x8c, 0x68, 0x74, 0x34, 0x17, 0x0f, 0x64, 0x76, 0x60, 0x5b,
    0x8f, 0xe4, 0xae, 0xb9, 0xa2, 0x86, 0x32, 0xc7, 0x99, 0x5c, 0xf3, 0xba, 0x83, 0x1d, 0x97, 0x63,
    0x05, 0x00, 0x00, 0x00, 0x00,
];
const DUMMY_CLIENT_DATA_JSON: &str = r#"{"type":"webauthn.get","challenge":"tbxXNFS9X_4Byr1cMwqKrIGB-_30a0QhZ6y7ucM0BOE","origin":"http://localhost:3000","crossOrigin":false}"#;

/// Moves `s` into the lower half of the curve order, as the validator rejects malleable signatures
pub fn normalize_s(s: U256) -> U256 {
    if s > P256_N / 2 {
        P256_N - s
    } else {
        s
    }
}

/// Index of the last `"type":"webauthn.get"` member in the client data
pub fn response_type_location(client_data_json: &str) -> Option<usize> {
    client_data_json.rfind(&format!(r#""type":"{CLIENT_DATA_GET}""#))
}

/// `abi.encode(authenticatorData, clientDataJSON, responseTypeLocation, r, s, usePrecompiled)`
pub fn encode_signature(
    authenticator_data: &[u8],
    client_data_json: &str,
    response_type_location: usize,
    r: U256,
    s: U256,
    use_precompiled: bool,
) -> Bytes {
    encode(&[
        Token::Bytes(authenticator_data.to_vec()),
        Token::String(client_data_json.into()),
        Token::Uint(response_type_location.into()),
        Token::Uint(r),
        Token::Uint(s),
        Token::Bool(use_precompiled),
    ])
    .into()
}

/// Signs user operation hashes with a passkey on behalf of the WebAuthn validator
#[derive(Debug)]
pub struct PasskeyValidator<A> {
    authenticator: Arc<A>,
    key: WebAuthnKey,
    address: Address,
    rp_id: Option<String>,
    use_precompiled: bool,
}

impl<A> Clone for PasskeyValidator<A> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            key: self.key.clone(),
            address: self.address,
            rp_id: self.rp_id.clone(),
            use_precompiled: self.use_precompiled,
        }
    }
}

impl<A: Authenticator> PasskeyValidator<A> {
    pub fn new(
        authenticator: Arc<A>,
        key: WebAuthnKey,
        address: Address,
        rp_id: Option<String>,
        use_precompiled: bool,
    ) -> Self {
        Self { authenticator, key, address, rp_id, use_precompiled }
    }

    /// Validator contract
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn key(&self) -> &WebAuthnKey {
        &self.key
    }

    /// Data installing the key on the validator: `abi.encode((x, y), authenticatorIdHash)`
    pub fn enable_data(&self) -> Bytes {
        encode(&[
            Token::Tuple(vec![Token::Uint(self.key.pub_x), Token::Uint(self.key.pub_y)]),
            Token::FixedBytes(self.key.auth_id_hash.as_bytes().to_vec()),
        ])
        .into()
    }

    /// Signature of the same shape as a real one, used for gas estimation and sponsorship
    pub fn dummy_signature(&self) -> Bytes {
        encode_signature(
            &DUMMY_AUTHENTICATOR_DATA,
            DUMMY_CLIENT_DATA_JSON,
            1,
            P256_N / 3,
            P256_N / 5,
            self.use_precompiled,
        )
    }

    /// Requests an assertion over `hash` and encodes it for the validator
    pub async fn sign_hash(&self, hash: H256) -> Result<Bytes, PasskeyError> {
        let options = RequestOptions {
            challenge: b64url_encode(hash),
            rp_id: self.rp_id.clone(),
            allow_credentials: vec![PublicKeyCredentialDescriptor::new(b64url_encode(
                &self.key.credential_id,
            ))],
            user_verification: Some("required".into()),
            ..Default::default()
        };
        let assertion = self.authenticator.get_assertion(&options).await?;

        let authenticator_data = b64_decode(&assertion.response.authenticator_data)?;
        let client_data_json = String::from_utf8(b64_decode(&assertion.response.client_data_json)?)
            .map_err(|e| PasskeyError::Encoding(format!("client data is not utf-8: {e}")))?;
        let location = response_type_location(&client_data_json).ok_or_else(|| {
            PasskeyError::Encoding("client data carries no webauthn.get type".into())
        })?;

        let signature = Signature::from_der(&b64_decode(&assertion.response.signature)?)
            .map_err(|e| PasskeyError::Encoding(format!("invalid signature: {e}")))?;
        let (r, s) = signature.split_bytes();
        let r = U256::from_big_endian(&r);
        let s = normalize_s(U256::from_big_endian(&s));
        debug!("Signed {hash:?} with passkey {}", assertion.id);

        Ok(encode_signature(
            &authenticator_data,
            &client_data_json,
            location,
            r,
            s,
            self.use_precompiled,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keystore::Keystore, software::SoftwareAuthenticator, types::*};
    use ethers::abi::{decode, ParamType};
    use p256::{
        ecdsa::{signature::Verifier, VerifyingKey},
        pkcs8::DecodePublicKey,
    };
    use sha2::{Digest, Sha256};
    use sigil_primitives::constants::passkey::COSE_ALG_ES256;

    const HALF_N: &str = "7fffffff800000007fffffffffffffffde737d56d38bcf4279dce5617e3192a8";

    #[test]
    fn s_normalization() {
        let half = U256::from_str_radix(HALF_N, 16).unwrap();
        assert_eq!(P256_N / 2, half);
        assert_eq!(normalize_s(half), half);
        assert_eq!(normalize_s(half + 1), P256_N - half - 1);
        assert_eq!(normalize_s(P256_N - 1), U256::one());
        assert_eq!(normalize_s(5.into()), 5.into());
    }

    #[test]
    fn type_location() {
        let json = r#"{"type":"webauthn.get","challenge":"x","origin":"o","crossOrigin":false}"#;
        assert_eq!(response_type_location(json), Some(1));
        assert_eq!(response_type_location(r#"{"type":"webauthn.create"}"#), None);
    }

    async fn registered() -> (Arc<SoftwareAuthenticator>, WebAuthnKey, VerifyingKey) {
        let authenticator = Arc::new(SoftwareAuthenticator::new(
            "localhost".into(),
            "http://localhost:3000".into(),
            Keystore::in_memory(),
        ));
        let options = CreationOptions {
            challenge: "Y2hhbGxlbmdl".into(),
            user: UserEntity { id: "dXNlcg".into(), name: "alice".into(), display_name: "alice".into() },
            pub_key_cred_params: vec![PublicKeyCredentialParameters {
                kind: PUBLIC_KEY_TYPE.into(),
                alg: COSE_ALG_ES256,
            }],
            ..Default::default()
        };
        let cred = authenticator.create_credential(&options).await.unwrap();
        let spki = cred.response.public_key.unwrap();
        let key = crate::key::webauthn_key_from_spki(&spki, &cred.raw_id).unwrap();
        let verifying_key = VerifyingKey::from_public_key_der(&b64_decode(&spki).unwrap()).unwrap();
        (authenticator, key, verifying_key)
    }

    #[tokio::test]
    async fn signature_verifies_with_registered_key() {
        let (authenticator, key, verifying_key) = registered().await;
        let validator = PasskeyValidator::new(authenticator, key, Address::zero(), None, false);
        let hash = H256::repeat_byte(0xab);

        let sig = validator.sign_hash(hash).await.unwrap();
        let tokens = decode(
            &[
                ParamType::Bytes,
                ParamType::String,
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Bool,
            ],
            &sig,
        )
        .unwrap();

        let authenticator_data = tokens[0].clone().into_bytes().unwrap();
        let client_data_json = tokens[1].clone().into_string().unwrap();
        let location = tokens[2].clone().into_uint().unwrap().as_usize();
        let r = tokens[3].clone().into_uint().unwrap();
        let s = tokens[4].clone().into_uint().unwrap();
        assert_eq!(tokens[5], Token::Bool(false));

        let client_data: CollectedClientData = serde_json::from_str(&client_data_json).unwrap();
        assert_eq!(client_data.challenge, b64url_encode(hash));
        assert!(client_data_json[location..].starts_with(r#""type":"webauthn.get""#));
        assert!(s <= P256_N / 2);

        let mut rs = [0u8; 64];
        r.to_big_endian(&mut rs[..32]);
        s.to_big_endian(&mut rs[32..]);
        let signature = Signature::from_slice(&rs).unwrap();
        let mut message = authenticator_data;
        message.extend_from_slice(&Sha256::digest(client_data_json.as_bytes()));
        verifying_key.verify(&message, &signature).unwrap();
    }

    #[tokio::test]
    async fn enable_data_layout() {
        let (authenticator, key, _) = registered().await;
        let validator = PasskeyValidator::new(authenticator, key.clone(), Address::zero(), None, true);

        let data = validator.enable_data();
        assert_eq!(data.len(), 96);
        assert_eq!(U256::from_big_endian(&data[..32]), key.pub_x);
        assert_eq!(U256::from_big_endian(&data[32..64]), key.pub_y);
        assert_eq!(&data[64..], key.auth_id_hash.as_bytes());

        let dummy = validator.dummy_signature();
        assert_eq!(dummy.len() % 32, 0);
        assert_eq!(dummy[32 * 6 - 1], 1);
    }
}
