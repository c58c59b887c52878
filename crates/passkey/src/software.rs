//! Software authenticator backed by P-256 keys held in a keystore

use crate::{
    authenticator::Authenticator,
    error::PasskeyError,
    key::{b64_decode, b64url_encode},
    keystore::{Keystore, StoredCredential},
    types::{
        AssertionResponse, AttestationResponse, AuthenticationCredential, CollectedClientData,
        CreationOptions, RegistrationCredential, RequestOptions, CLIENT_DATA_CREATE,
        CLIENT_DATA_GET, PUBLIC_KEY_TYPE,
    },
};
use async_trait::async_trait;
use ciborium::value::Value;
use p256::{
    ecdsa::{signature::Signer, Signature, SigningKey},
    pkcs8::EncodePublicKey,
};
use parking_lot::Mutex;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use sigil_primitives::constants::passkey::COSE_ALG_ES256;
use tracing::{debug, info};

/// User present
const FLAG_UP: u8 = 0x01;
/// User verified
const FLAG_UV: u8 = 0x04;
/// Attested credential data included
const FLAG_AT: u8 = 0x40;

const CREDENTIAL_ID_LEN: usize = 32;

/// Authenticator that keeps its credentials in a [Keystore]
///
/// Every ceremony is approved without user interaction, so the user present and user verified
/// flags are always set.
#[derive(Debug)]
pub struct SoftwareAuthenticator {
    rp_id: String,
    origin: String,
    keystore: Mutex<Keystore>,
}

impl SoftwareAuthenticator {
    pub fn new(rp_id: String, origin: String, keystore: Keystore) -> Self {
        Self { rp_id, origin, keystore: Mutex::new(keystore) }
    }

    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of credentials held for the relying party
    pub fn credential_count(&self) -> usize {
        self.keystore.lock().credentials().iter().filter(|c| c.rp_id == self.rp_id).count()
    }

    fn client_data(&self, kind: &str, challenge: &str) -> Result<String, PasskeyError> {
        let client_data = CollectedClientData {
            kind: kind.into(),
            challenge: challenge.into(),
            origin: self.origin.clone(),
            cross_origin: false,
        };
        Ok(serde_json::to_string(&client_data)?)
    }

    /// `rpIdHash ‖ flags ‖ signCount`
    fn authenticator_data(&self, flags: u8, sign_count: u32) -> Vec<u8> {
        let mut data = Sha256::digest(self.rp_id.as_bytes()).to_vec();
        data.push(flags);
        data.extend_from_slice(&sign_count.to_be_bytes());
        data
    }

    fn check_rp_id(&self, rp_id: Option<&str>) -> Result<(), PasskeyError> {
        match rp_id {
            Some(rp_id) if rp_id != self.rp_id => Err(PasskeyError::Authenticator(format!(
                "relying party {rp_id} does not match {}",
                self.rp_id
            ))),
            _ => Ok(()),
        }
    }
}

/// COSE_Key of an ES256 public key
fn cose_key(signing_key: &SigningKey) -> Result<Vec<u8>, PasskeyError> {
    let point = signing_key.verifying_key().to_encoded_point(false);
    let (x, y) = match (point.x(), point.y()) {
        (Some(x), Some(y)) => (x.to_vec(), y.to_vec()),
        _ => return Err(PasskeyError::Encoding("public key is the identity point".into())),
    };
    let key = Value::Map(vec![
        (Value::Integer(1.into()), Value::Integer(2.into())),
        (Value::Integer(3.into()), Value::Integer(COSE_ALG_ES256.into())),
        (Value::Integer((-1).into()), Value::Integer(1.into())),
        (Value::Integer((-2).into()), Value::Bytes(x)),
        (Value::Integer((-3).into()), Value::Bytes(y)),
    ]);
    cbor(&key)
}

fn cbor(value: &Value) -> Result<Vec<u8>, PasskeyError> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| PasskeyError::Encoding(e.to_string()))?;
    Ok(buf)
}

#[async_trait]
impl Authenticator for SoftwareAuthenticator {
    async fn create_credential(
        &self,
        options: &CreationOptions,
    ) -> Result<RegistrationCredential, PasskeyError> {
        self.check_rp_id(options.rp.id.as_deref())?;
        if !options.pub_key_cred_params.is_empty() &&
            !options.pub_key_cred_params.iter().any(|p| p.alg == COSE_ALG_ES256)
        {
            return Err(PasskeyError::Authenticator("ES256 is not an accepted algorithm".into()));
        }

        let signing_key = SigningKey::random(&mut OsRng);
        let mut credential_id = [0u8; CREDENTIAL_ID_LEN];
        OsRng.fill_bytes(&mut credential_id);

        let mut auth_data = self.authenticator_data(FLAG_UP | FLAG_UV | FLAG_AT, 0);
        // aaguid
        auth_data.extend_from_slice(&[0u8; 16]);
        auth_data.extend_from_slice(&(CREDENTIAL_ID_LEN as u16).to_be_bytes());
        auth_data.extend_from_slice(&credential_id);
        auth_data.extend_from_slice(&cose_key(&signing_key)?);

        let attestation_object = cbor(&Value::Map(vec![
            (Value::Text("fmt".into()), Value::Text("none".into())),
            (Value::Text("attStmt".into()), Value::Map(vec![])),
            (Value::Text("authData".into()), Value::Bytes(auth_data.clone())),
        ]))?;
        let public_key = signing_key
            .verifying_key()
            .to_public_key_der()
            .map_err(|e| PasskeyError::Encoding(e.to_string()))?;

        let id = b64url_encode(credential_id);
        self.keystore.lock().insert(StoredCredential {
            credential_id: id.clone(),
            rp_id: self.rp_id.clone(),
            user_handle: options.user.id.clone(),
            user_name: options.user.name.clone(),
            secret_key: b64url_encode(signing_key.to_bytes()),
            sign_count: 0,
        })?;
        info!("Created passkey {id} for {:?} on {}", options.user.name, self.rp_id);

        Ok(RegistrationCredential {
            id: id.clone(),
            raw_id: id,
            kind: PUBLIC_KEY_TYPE.into(),
            response: AttestationResponse {
                client_data_json: b64url_encode(
                    self.client_data(CLIENT_DATA_CREATE, &options.challenge)?,
                ),
                attestation_object: b64url_encode(attestation_object),
                authenticator_data: Some(b64url_encode(auth_data)),
                public_key: Some(b64url_encode(public_key.as_bytes())),
                public_key_algorithm: Some(COSE_ALG_ES256),
                transports: vec!["internal".into()],
            },
            authenticator_attachment: Some("platform".into()),
            client_extension_results: Default::default(),
        })
    }

    async fn get_assertion(
        &self,
        options: &RequestOptions,
    ) -> Result<AuthenticationCredential, PasskeyError> {
        self.check_rp_id(options.rp_id.as_deref())?;

        let mut keystore = self.keystore.lock();
        let credential = if options.allow_credentials.is_empty() {
            keystore.latest(&self.rp_id)
        } else {
            options
                .allow_credentials
                .iter()
                .find_map(|allowed| keystore.find(&self.rp_id, &allowed.id))
        }
        .cloned()
        .ok_or_else(|| PasskeyError::CredentialNotFound { rp_id: self.rp_id.clone() })?;

        let signing_key = SigningKey::from_slice(&b64_decode(&credential.secret_key)?)
            .map_err(|e| PasskeyError::Keystore(format!("invalid secret key: {e}")))?;
        let sign_count = keystore.bump_sign_count(&credential.credential_id)?;
        drop(keystore);

        let auth_data = self.authenticator_data(FLAG_UP | FLAG_UV, sign_count);
        let client_data_json = self.client_data(CLIENT_DATA_GET, &options.challenge)?;

        let mut message = auth_data.clone();
        message.extend_from_slice(&Sha256::digest(client_data_json.as_bytes()));
        let signature: Signature = signing_key.sign(&message);
        debug!("Signed assertion with passkey {} (count {sign_count})", credential.credential_id);

        Ok(AuthenticationCredential {
            id: credential.credential_id.clone(),
            raw_id: credential.credential_id,
            kind: PUBLIC_KEY_TYPE.into(),
            response: AssertionResponse {
                client_data_json: b64url_encode(client_data_json),
                authenticator_data: b64url_encode(auth_data),
                signature: b64url_encode(signature.to_der().as_bytes()),
                user_handle: Some(credential.user_handle),
            },
            authenticator_attachment: Some("platform".into()),
            client_extension_results: Default::default(),
        })
    }
}
