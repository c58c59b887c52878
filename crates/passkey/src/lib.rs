//! Passkey (WebAuthn) credentials, passkey server ceremonies and validator signatures
mod authenticator;
mod error;
pub mod key;
mod keystore;
mod server;
mod software;
pub mod types;
mod validator;

pub use authenticator::Authenticator;
pub use error::PasskeyError;
pub use keystore::{Keystore, StoredCredential};
pub use server::PasskeyServerClient;
pub use software::SoftwareAuthenticator;
pub use validator::{
    encode_signature, normalize_s, response_type_location, PasskeyValidator, P256_N,
};
