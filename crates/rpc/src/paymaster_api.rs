use ethers::types::Address;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use serde::{Deserialize, Serialize};
use sigil_primitives::{utils::as_checksum_addr, SponsorUserOperationResult, UserOperationSigned};

/// Sponsorship request of the ZeroDev paymaster
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorUserOperationRequest {
    pub chain_id: u64,
    pub user_op: UserOperationSigned,
    #[serde(serialize_with = "as_checksum_addr")]
    pub entry_point_address: Address,
    /// Keep the fees of the user operation instead of the paymaster's
    pub should_override_fee: bool,
    /// Count the sponsorship against the project's gas policy
    pub should_consume: bool,
}

/// ZeroDev paymaster (`zd` namespace)
#[rpc(client, server, namespace = "zd")]
pub trait PaymasterApi {
    /// Request sponsorship of a user operation.
    ///
    /// # Arguments
    /// * `request: SponsorUserOperationRequest` - The user operation with the chain and entry
    ///   point it targets.
    ///
    /// # Returns
    /// * `RpcResult<SponsorUserOperationResult>` - Paymaster fields and gas limits to apply
    ///   before signing.
    #[method(name = "sponsorUserOperation")]
    async fn sponsor_user_operation(
        &self,
        request: SponsorUserOperationRequest,
    ) -> RpcResult<SponsorUserOperationResult>;
}
