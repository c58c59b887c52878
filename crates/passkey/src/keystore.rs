//! On-disk store of software authenticator credentials

use crate::error::PasskeyError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Credential held by the software authenticator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    /// Base64url credential id
    pub credential_id: String,
    pub rp_id: String,
    /// Base64url user handle
    pub user_handle: String,
    pub user_name: String,
    /// Base64url P-256 secret scalar
    pub secret_key: String,
    pub sign_count: u32,
}

/// Credentials of the software authenticator, optionally persisted as JSON
#[derive(Debug, Default)]
pub struct Keystore {
    path: Option<PathBuf>,
    credentials: Vec<StoredCredential>,
}

impl Keystore {
    /// Keystore kept in memory only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the keystore at `path` (missing file means no credentials yet)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PasskeyError> {
        let path = path.as_ref().to_path_buf();
        let credentials = if path.exists() {
            let data = fs::read(&path).map_err(|e| PasskeyError::Keystore(e.to_string()))?;
            serde_json::from_slice(&data)?
        } else {
            vec![]
        };
        debug!("Opened keystore {path:?} with {} credentials", credentials.len());
        Ok(Self { path: Some(path), credentials })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn credentials(&self) -> &[StoredCredential] {
        &self.credentials
    }

    /// Most recently created credential of the relying party (discoverable credential lookup)
    pub fn latest(&self, rp_id: &str) -> Option<&StoredCredential> {
        self.credentials.iter().rev().find(|c| c.rp_id == rp_id)
    }

    pub fn find(&self, rp_id: &str, credential_id: &str) -> Option<&StoredCredential> {
        self.credentials.iter().find(|c| c.rp_id == rp_id && c.credential_id == credential_id)
    }

    pub fn insert(&mut self, credential: StoredCredential) -> Result<(), PasskeyError> {
        self.credentials.push(credential);
        self.save()
    }

    /// Increments and returns the signature counter of the credential
    pub fn bump_sign_count(&mut self, credential_id: &str) -> Result<u32, PasskeyError> {
        let credential = self
            .credentials
            .iter_mut()
            .find(|c| c.credential_id == credential_id)
            .ok_or_else(|| PasskeyError::Keystore(format!("unknown credential {credential_id}")))?;
        credential.sign_count = credential.sign_count.wrapping_add(1);
        let count = credential.sign_count;
        self.save()?;
        Ok(count)
    }

    fn save(&self) -> Result<(), PasskeyError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PasskeyError::Keystore(e.to_string()))?;
        }
        let data = serde_json::to_vec_pretty(&self.credentials)?;
        fs::write(path, data).map_err(|e| PasskeyError::Keystore(e.to_string()))
    }
}
