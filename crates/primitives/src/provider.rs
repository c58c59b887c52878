//! Utils for creating ethers providers

use ethers::{
    providers::{Http, Middleware, Provider},
    types::Chain,
};
use std::time::Duration;

/// Creates ethers provider with HTTP connection
///
/// The chain id is queried once to pick the polling interval, so an unreachable endpoint is
/// reported here rather than on the first account derivation.
pub async fn create_http_provider(addr: &str) -> eyre::Result<Provider<Http>> {
    let provider = Provider::<Http>::try_from(addr)?;

    let chain_id = provider.get_chainid().await?;

    Ok(provider.interval(if chain_id == Chain::Dev.into() {
        Duration::from_millis(5u64)
    } else {
        Duration::from_millis(500u64)
    }))
}
