use crate::{
    bundler_api::{BundlerApiClient, ZeroDevBundlerApiClient},
    error::RpcError,
};
use ethers::types::{Address, U64};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use sigil_primitives::{
    UserOperationByHash, UserOperationGasEstimation, UserOperationGasPrice, UserOperationHash,
    UserOperationReceipt, UserOperationRequest, UserOperationSigned,
};
use std::time::Duration;
use tracing::{debug, trace};

/// HTTP client of an ERC-4337 bundler bound to a single entry point
#[derive(Clone, Debug)]
pub struct BundlerClient {
    /// JSON-RPC client
    client: HttpClient,
    /// Entry point user operations are submitted to
    entry_point: Address,
}

impl BundlerClient {
    pub fn new(url: &str, entry_point: Address, timeout: Duration) -> Result<Self, RpcError> {
        let client = build_http_client(url, timeout)?;
        Ok(Self { client, entry_point })
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    pub async fn chain_id(&self) -> Result<U64, RpcError> {
        Ok(BundlerApiClient::chain_id(&self.client).await?)
    }

    pub async fn supported_entry_points(&self) -> Result<Vec<Address>, RpcError> {
        Ok(BundlerApiClient::supported_entry_points(&self.client).await?)
    }

    pub async fn send_user_operation(
        &self,
        uo: &UserOperationSigned,
    ) -> Result<UserOperationHash, RpcError> {
        trace!("Sending user operation {uo:?} to entry point {:?}", self.entry_point);
        let hash =
            BundlerApiClient::send_user_operation(&self.client, uo.clone(), self.entry_point)
                .await?;
        debug!("Bundler accepted user operation {hash}");
        Ok(hash)
    }

    pub async fn estimate_user_operation_gas(
        &self,
        uo: UserOperationRequest,
    ) -> Result<UserOperationGasEstimation, RpcError> {
        Ok(BundlerApiClient::estimate_user_operation_gas(&self.client, uo, self.entry_point)
            .await?)
    }

    pub async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, RpcError> {
        Ok(BundlerApiClient::get_user_operation_receipt(&self.client, *hash).await?)
    }

    pub async fn get_user_operation_by_hash(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationByHash>, RpcError> {
        Ok(BundlerApiClient::get_user_operation_by_hash(&self.client, *hash).await?)
    }

    pub async fn get_user_operation_gas_price(&self) -> Result<UserOperationGasPrice, RpcError> {
        Ok(ZeroDevBundlerApiClient::get_user_operation_gas_price(&self.client).await?)
    }
}

pub(crate) fn build_http_client(url: &str, timeout: Duration) -> Result<HttpClient, RpcError> {
    HttpClientBuilder::default()
        .request_timeout(timeout)
        .build(url)
        .map_err(|e| RpcError::Endpoint { url: url.into(), inner: e.to_string() })
}
