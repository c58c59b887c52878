//! Kernel v3.1 account rooted at a single validator

use crate::{
    error::SessionResult,
    traits::{AccountFactory, SmartAccount, Validator},
};
use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use sigil_contracts::{
    kernel::{deploy_with_factory_data, encode_execute, initialize_data, root_nonce_key},
    ContractError, EntryPoint, KernelFactory,
};
use sigil_primitives::{Call, UserOperationHash};
use std::sync::Arc;
use tracing::{debug, info};

/// Derives Kernel accounts through the kernel factory
pub struct KernelAccountFactory<M: Middleware + 'static> {
    eth_client: Arc<M>,
    entry_point: Address,
    factory: Address,
    meta_factory: Address,
    index: u64,
}

impl<M: Middleware + 'static> KernelAccountFactory<M> {
    /// # Arguments
    /// * `eth_client` - Chain RPC client
    /// * `entry_point` - Entry point the accounts are bound to
    /// * `factory` - Kernel factory deriving account addresses
    /// * `meta_factory` - Factory staker deploying accounts through `factory`
    /// * `index` - Account index (salt)
    pub fn new(
        eth_client: Arc<M>,
        entry_point: Address,
        factory: Address,
        meta_factory: Address,
        index: u64,
    ) -> Self {
        Self { eth_client, entry_point, factory, meta_factory, index }
    }
}

#[async_trait]
impl<M: Middleware + 'static> AccountFactory for KernelAccountFactory<M> {
    async fn build(&self, validator: Arc<dyn Validator>) -> SessionResult<Arc<dyn SmartAccount>> {
        let init_data = initialize_data(validator.address(), validator.enable_data());
        let address = KernelFactory::new(self.eth_client.clone(), self.factory)
            .get_address(init_data.clone(), self.index)
            .await?;
        info!("Account bound: {address:?} (validator {:?})", validator.address());

        Ok(Arc::new(KernelAccount {
            address,
            factory_args: (
                self.meta_factory,
                deploy_with_factory_data(self.factory, init_data, self.index),
            ),
            entry_point: EntryPoint::new(self.eth_client.clone(), self.entry_point),
            validator,
        }))
    }
}

/// Kernel account whose root validator signs every user operation
pub struct KernelAccount<M: Middleware + 'static> {
    address: Address,
    factory_args: (Address, Bytes),
    entry_point: EntryPoint<M>,
    validator: Arc<dyn Validator>,
}

#[async_trait]
impl<M: Middleware + 'static> SmartAccount for KernelAccount<M> {
    fn address(&self) -> Address {
        self.address
    }

    fn encode_calls(&self, calls: &[Call]) -> Bytes {
        encode_execute(calls)
    }

    async fn nonce(&self) -> SessionResult<U256> {
        let key = root_nonce_key(self.validator.address());
        Ok(self.entry_point.get_nonce(&self.address, key).await?)
    }

    async fn factory_args(&self) -> SessionResult<Option<(Address, Bytes)>> {
        let code = self
            .entry_point
            .eth_client()
            .get_code(self.address, None)
            .await
            .map_err(ContractError::from_middleware_error::<M>)?;
        if code.is_empty() {
            debug!("Account {:?} is not deployed yet", self.address);
            Ok(Some(self.factory_args.clone()))
        } else {
            Ok(None)
        }
    }

    fn dummy_signature(&self) -> Bytes {
        self.validator.dummy_signature()
    }

    async fn sign_user_operation_hash(&self, hash: UserOperationHash) -> SessionResult<Bytes> {
        self.validator.sign_hash(hash.0).await
    }
}
