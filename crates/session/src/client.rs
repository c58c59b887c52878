use crate::{
    error::SessionResult,
    traits::{Bundler, SmartAccount, Sponsor},
    wait::WaitConfig,
};
use alloy_chains::Chain;
use ethers::types::Address;
use sigil_primitives::{Call, UserOperationHash, UserOperationReceipt, UserOperationSigned};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Submission client bound to a smart account, a chain and a sponsorship provider
#[derive(Clone)]
pub struct SubmissionClient {
    account: Arc<dyn SmartAccount>,
    chain: Chain,
    sponsor: Arc<dyn Sponsor>,
    bundler: Arc<dyn Bundler>,
}

impl SubmissionClient {
    pub fn new(
        account: Arc<dyn SmartAccount>,
        chain: Chain,
        sponsor: Arc<dyn Sponsor>,
        bundler: Arc<dyn Bundler>,
    ) -> Self {
        Self { account, chain, sponsor, bundler }
    }

    pub fn account(&self) -> &Arc<dyn SmartAccount> {
        &self.account
    }

    pub fn address(&self) -> Address {
        self.account.address()
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn entry_point(&self) -> Address {
        self.bundler.entry_point()
    }

    /// Builds the user operation executing `calls`, with the dummy signature
    pub async fn prepare_user_operation(&self, calls: &[Call]) -> SessionResult<UserOperationSigned> {
        let call_data = self.account.encode_calls(calls);
        let nonce = self.account.nonce().await?;
        let factory = self.account.factory_args().await?;
        let gas_price = self.bundler.user_operation_gas_price().await?;

        Ok(UserOperationSigned::default()
            .sender(self.account.address())
            .nonce(nonce)
            .factory(factory)
            .call_data(call_data)
            .max_fee_per_gas(gas_price.standard.max_fee_per_gas)
            .max_priority_fee_per_gas(gas_price.standard.max_priority_fee_per_gas)
            .signature(self.account.dummy_signature()))
    }

    /// Sponsors, signs and submits a user operation executing `calls`
    ///
    /// Returns the hash the bundler reports for the user operation.
    pub async fn send_user_operation(&self, calls: &[Call]) -> SessionResult<UserOperationHash> {
        let entry_point = self.entry_point();
        let chain_id = self.chain.id();

        let uo = self.prepare_user_operation(calls).await?;
        let sponsorship = self.sponsor.sponsor(&uo, entry_point, chain_id).await?;
        let uo = uo.sponsored(sponsorship);

        let hash = uo.hash(&entry_point, chain_id);
        let signature = self.account.sign_user_operation_hash(hash).await?;
        let uo = uo.signature(signature);
        trace!("Submitting user operation {uo:?}");

        let submitted = self.bundler.send_user_operation(&uo).await?;
        if submitted != hash {
            warn!("Bundler reported hash {submitted}, computed {hash}");
        }
        info!("User operation {submitted} submitted from {:?}", uo.sender);
        Ok(submitted)
    }

    pub async fn wait_for_inclusion(
        &self,
        hash: UserOperationHash,
        config: &WaitConfig,
        cancel: &CancellationToken,
    ) -> SessionResult<UserOperationReceipt> {
        debug!("Waiting up to {:?} for user operation {hash}", config.timeout);
        self.bundler.wait_for_inclusion(hash, config, cancel).await
    }
}
