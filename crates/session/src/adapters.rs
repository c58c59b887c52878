//! Session capabilities over the passkey, bundler and paymaster clients

use crate::{
    error::{SessionError, SessionResult},
    traits::{Bundler, CredentialService, Sponsor, Validator},
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256};
use sigil_passkey::{Authenticator, PasskeyServerClient, PasskeyValidator};
use sigil_primitives::{
    SponsorUserOperationResult, UserOperationGasPrice, UserOperationHash, UserOperationReceipt,
    UserOperationSigned,
};
use sigil_rpc::{BundlerClient, PaymasterClient};
use std::sync::Arc;

/// Passkey server ceremonies producing WebAuthn validators
pub struct PasskeyCredentials<A> {
    server: PasskeyServerClient<A>,
    validator: Address,
    rp_id: Option<String>,
    use_precompiled: bool,
}

impl<A: Authenticator + 'static> PasskeyCredentials<A> {
    /// # Arguments
    /// * `server` - Passkey server client
    /// * `validator` - WebAuthn validator contract
    /// * `rp_id` - Relying party the assertions are requested for
    /// * `use_precompiled` - Whether the validator verifies through the P-256 precompile
    pub fn new(
        server: PasskeyServerClient<A>,
        validator: Address,
        rp_id: Option<String>,
        use_precompiled: bool,
    ) -> Self {
        Self { server, validator, rp_id, use_precompiled }
    }

    fn validator(&self, key: sigil_primitives::WebAuthnKey) -> Arc<dyn Validator> {
        Arc::new(PasskeyValidator::new(
            self.server.authenticator(),
            key,
            self.validator,
            self.rp_id.clone(),
            self.use_precompiled,
        ))
    }
}

#[async_trait]
impl<A: Authenticator + 'static> CredentialService for PasskeyCredentials<A> {
    async fn register(&self, label: &str) -> SessionResult<Arc<dyn Validator>> {
        let key = self.server.register(label).await?;
        Ok(self.validator(key))
    }

    async fn resolve(&self) -> SessionResult<Arc<dyn Validator>> {
        let key = self.server.login().await?;
        Ok(self.validator(key))
    }
}

#[async_trait]
impl<A: Authenticator + 'static> Validator for PasskeyValidator<A> {
    fn address(&self) -> Address {
        PasskeyValidator::address(self)
    }

    fn enable_data(&self) -> Bytes {
        PasskeyValidator::enable_data(self)
    }

    fn dummy_signature(&self) -> Bytes {
        PasskeyValidator::dummy_signature(self)
    }

    async fn sign_hash(&self, hash: H256) -> SessionResult<Bytes> {
        Ok(PasskeyValidator::sign_hash(self, hash).await?)
    }
}

#[async_trait]
impl Bundler for BundlerClient {
    fn entry_point(&self) -> Address {
        BundlerClient::entry_point(self)
    }

    async fn send_user_operation(
        &self,
        user_operation: &UserOperationSigned,
    ) -> SessionResult<UserOperationHash> {
        BundlerClient::send_user_operation(self, user_operation)
            .await
            .map_err(SessionError::submission)
    }

    async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> SessionResult<Option<UserOperationReceipt>> {
        BundlerClient::get_user_operation_receipt(self, hash)
            .await
            .map_err(|e| SessionError::Inclusion { hash: *hash, inner: e.to_string() })
    }

    async fn user_operation_gas_price(&self) -> SessionResult<UserOperationGasPrice> {
        self.get_user_operation_gas_price().await.map_err(SessionError::submission)
    }
}

#[async_trait]
impl Sponsor for PaymasterClient {
    async fn sponsor(
        &self,
        user_operation: &UserOperationSigned,
        entry_point: Address,
        chain_id: u64,
    ) -> SessionResult<SponsorUserOperationResult> {
        if entry_point != self.entry_point() || chain_id != self.chain_id() {
            return Err(SessionError::Sponsorship {
                inner: format!(
                    "paymaster is bound to chain {} and entry point {:?}",
                    self.chain_id(),
                    self.entry_point()
                ),
            });
        }
        self.sponsor_user_operation(user_operation).await.map_err(SessionError::sponsorship)
    }
}
