//! Capabilities the session is built from

use crate::{error::SessionResult, wait::WaitConfig};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use sigil_primitives::{
    Call, SponsorUserOperationResult, UserOperationGasPrice, UserOperationHash,
    UserOperationReceipt, UserOperationSigned,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Authorizes user operations on behalf of a credential
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validator contract
    fn address(&self) -> Address;

    /// Data installing the credential on the validator contract
    fn enable_data(&self) -> Bytes;

    /// Placeholder signature with the size of a real one
    fn dummy_signature(&self) -> Bytes;

    /// Signs the hash with the credential
    async fn sign_hash(&self, hash: H256) -> SessionResult<Bytes>;
}

/// Creates and resolves credentials, producing validators for them
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Creates a new credential for the label
    async fn register(&self, label: &str) -> SessionResult<Arc<dyn Validator>>;

    /// Resolves an existing credential
    async fn resolve(&self) -> SessionResult<Arc<dyn Validator>>;
}

/// Smart account controlled by a single validator
#[async_trait]
pub trait SmartAccount: Send + Sync {
    fn address(&self) -> Address;

    /// Call data executing the calls from the account
    fn encode_calls(&self, calls: &[Call]) -> Bytes;

    /// Next nonce of the account on the entry point
    async fn nonce(&self) -> SessionResult<U256>;

    /// Factory and factory data deploying the account, `None` once it is deployed
    async fn factory_args(&self) -> SessionResult<Option<(Address, Bytes)>>;

    fn dummy_signature(&self) -> Bytes;

    async fn sign_user_operation_hash(&self, hash: UserOperationHash) -> SessionResult<Bytes>;
}

/// Derives the smart account controlled by a validator
#[async_trait]
pub trait AccountFactory: Send + Sync {
    /// Builds the account handle
    ///
    /// # Arguments
    /// * `validator` - Validator which becomes the root validator of the account
    ///
    /// # Returns
    /// * `Arc<dyn SmartAccount>` - The account, whose address is the same for the same validator
    async fn build(&self, validator: Arc<dyn Validator>) -> SessionResult<Arc<dyn SmartAccount>>;
}

/// ERC-4337 bundler
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Entry point user operations are submitted to
    fn entry_point(&self) -> Address;

    async fn send_user_operation(
        &self,
        user_operation: &UserOperationSigned,
    ) -> SessionResult<UserOperationHash>;

    async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> SessionResult<Option<UserOperationReceipt>>;

    async fn user_operation_gas_price(&self) -> SessionResult<UserOperationGasPrice>;

    /// Polls the receipt until the user operation is included
    ///
    /// # Arguments
    /// * `hash` - Hash returned by [send_user_operation](Bundler::send_user_operation)
    /// * `config` - Poll interval and timeout
    /// * `cancel` - Stops waiting when cancelled
    ///
    /// # Returns
    /// * `UserOperationReceipt` - Receipt of the included user operation
    async fn wait_for_inclusion(
        &self,
        hash: UserOperationHash,
        config: &WaitConfig,
        cancel: &CancellationToken,
    ) -> SessionResult<UserOperationReceipt> {
        crate::wait::wait_for_receipt(self, hash, config, cancel).await
    }
}

/// Gas sponsorship provider (paymaster)
#[async_trait]
pub trait Sponsor: Send + Sync {
    /// Requests sponsorship of a user operation carrying a dummy signature
    async fn sponsor(
        &self,
        user_operation: &UserOperationSigned,
        entry_point: Address,
        chain_id: u64,
    ) -> SessionResult<SponsorUserOperationResult>;
}
