pub use super::gen::EntryPointAPI;
use crate::error::ContractError;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;

/// Read-only view of the entry point contract
#[derive(Clone)]
pub struct EntryPoint<M: Middleware + 'static> {
    eth_client: Arc<M>,
    address: Address,
    entry_point_api: EntryPointAPI<M>,
}

impl<M: Middleware + 'static> EntryPoint<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let entry_point_api = EntryPointAPI::new(address, eth_client.clone());
        Self { eth_client, address, entry_point_api }
    }

    pub fn eth_client(&self) -> Arc<M> {
        self.eth_client.clone()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Nonce of the sender for the given 192-bit key
    pub async fn get_nonce(&self, address: &Address, key: U256) -> Result<U256, ContractError> {
        self.entry_point_api
            .get_nonce(*address, key)
            .call()
            .await
            .map_err(ContractError::from_contract_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{
        abi::AbiEncode,
        providers::{MockProvider, Provider},
        types::Bytes,
    };
    use sigil_primitives::constants::entry_point::ADDRESS;

    fn entry_point() -> (EntryPoint<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        (EntryPoint::new(Arc::new(provider), ADDRESS.parse().unwrap()), mock)
    }

    #[tokio::test]
    async fn get_nonce() -> eyre::Result<()> {
        let (entry_point, mock) = entry_point();
        mock.push::<Bytes, _>(Bytes::from(U256::from(7).encode()))?;

        let nonce = entry_point.get_nonce(&Address::random(), U256::from(1) << 64).await?;
        assert_eq!(nonce, 7.into());
        Ok(())
    }

    #[tokio::test]
    async fn get_nonce_revert() -> eyre::Result<()> {
        let (entry_point, mock) = entry_point();
        mock.push_response(ethers::providers::MockResponse::Error(
            ethers::providers::JsonRpcError {
                code: 3,
                message: "execution reverted".into(),
                data: Some(serde_json::json!("0x08c379a000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000004626f6f6d00000000000000000000000000000000000000000000000000000000")),
            },
        ));

        let err = entry_point.get_nonce(&Address::random(), U256::zero()).await.unwrap_err();
        assert_eq!(err, ContractError::ExecutionReverted("boom".into()));
        Ok(())
    }
}
