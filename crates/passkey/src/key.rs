//! Encoding helpers for passkey key material

use crate::error::PasskeyError;
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use ethers::types::Bytes;
use p256::{elliptic_curve::sec1::ToEncodedPoint, pkcs8::DecodePublicKey, PublicKey};
use sigil_primitives::WebAuthnKey;

pub fn b64url_encode<T: AsRef<[u8]>>(data: T) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes base64 in either alphabet, with or without padding
pub fn b64_decode(data: &str) -> Result<Vec<u8>, PasskeyError> {
    let trimmed = data.trim_end_matches('=');
    if trimmed.contains(['+', '/']) {
        Ok(STANDARD.decode(data)?)
    } else {
        Ok(URL_SAFE_NO_PAD.decode(trimmed)?)
    }
}

/// Builds the validator key from a SPKI (DER) encoded P-256 public key and a credential id
pub fn webauthn_key_from_spki(spki: &str, credential_id: &str) -> Result<WebAuthnKey, PasskeyError> {
    let der = b64_decode(spki)?;
    let public_key = PublicKey::from_public_key_der(&der)
        .map_err(|e| PasskeyError::Encoding(format!("invalid public key: {e}")))?;
    let point = public_key.to_encoded_point(false);
    let (x, y) = match (point.x(), point.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(PasskeyError::Encoding("public key is the identity point".into())),
    };
    let credential_id = Bytes::from(b64_decode(credential_id)?);

    Ok(WebAuthnKey::from_coordinates(x, y, credential_id))
}
