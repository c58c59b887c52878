use thiserror::Error;

/// Passkey errors
#[derive(Debug, Error)]
pub enum PasskeyError {
    /// Passkey server could not be reached
    #[error("passkey server request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Passkey server answered with an error status
    #[error("passkey server returned {status} for {path}: {body}")]
    Server {
        /// Endpoint path
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Passkey server did not verify the ceremony
    #[error("passkey {0} was not verified by the server")]
    NotVerified(&'static str),

    /// Authenticator refused or failed the ceremony
    #[error("authenticator error: {0}")]
    Authenticator(String),

    /// No credential matches the request
    #[error("no passkey credential for relying party {rp_id}")]
    CredentialNotFound {
        /// Relying party id
        rp_id: String,
    },

    /// Malformed key, signature or payload
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Keystore could not be read or written
    #[error("keystore error: {0}")]
    Keystore(String),
}

impl From<base64::DecodeError> for PasskeyError {
    fn from(err: base64::DecodeError) -> Self {
        PasskeyError::Encoding(err.to_string())
    }
}

impl From<serde_json::Error> for PasskeyError {
    fn from(err: serde_json::Error) -> Self {
        PasskeyError::Encoding(err.to_string())
    }
}
