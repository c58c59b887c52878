use crate::{
    error::PasskeyError,
    types::{AuthenticationCredential, CreationOptions, RegistrationCredential, RequestOptions},
};
use async_trait::async_trait;

/// A WebAuthn authenticator (platform, roaming or software)
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Creates a new credential (registration ceremony)
    async fn create_credential(
        &self,
        options: &CreationOptions,
    ) -> Result<RegistrationCredential, PasskeyError>;

    /// Signs the challenge with an existing credential (authentication ceremony)
    async fn get_assertion(
        &self,
        options: &RequestOptions,
    ) -> Result<AuthenticationCredential, PasskeyError>;
}
