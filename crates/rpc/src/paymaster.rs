use crate::{
    bundler::build_http_client,
    error::RpcError,
    paymaster_api::{PaymasterApiClient, SponsorUserOperationRequest},
};
use ethers::types::Address;
use jsonrpsee::http_client::HttpClient;
use sigil_primitives::{SponsorUserOperationResult, UserOperationSigned};
use std::time::Duration;
use tracing::debug;

/// HTTP client of a ZeroDev paymaster bound to a chain and an entry point
#[derive(Clone, Debug)]
pub struct PaymasterClient {
    client: HttpClient,
    chain_id: u64,
    entry_point: Address,
}

impl PaymasterClient {
    pub fn new(
        url: &str,
        chain_id: u64,
        entry_point: Address,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let client = build_http_client(url, timeout)?;
        Ok(Self { client, chain_id, entry_point })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    /// Requests sponsorship of the (unsigned) user operation
    pub async fn sponsor_user_operation(
        &self,
        uo: &UserOperationSigned,
    ) -> Result<SponsorUserOperationResult, RpcError> {
        let request = SponsorUserOperationRequest {
            chain_id: self.chain_id,
            user_op: uo.clone(),
            entry_point_address: self.entry_point,
            should_override_fee: false,
            should_consume: true,
        };
        let res = self.client.sponsor_user_operation(request).await?;
        debug!("Paymaster {:?} sponsors user operation of {:?}", res.paymaster, uo.sender);
        Ok(res)
    }
}
