use ethers::types::{Address, U64};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use sigil_primitives::{
    UserOperationByHash, UserOperationGasEstimation, UserOperationGasPrice, UserOperationHash,
    UserOperationReceipt, UserOperationRequest, UserOperationSigned,
};

/// The ERC-4337 `eth` namespace RPC methods exposed by bundlers
#[rpc(client, server, namespace = "eth")]
pub trait BundlerApi {
    /// Retrieve the current [EIP-155](https://eips.ethereum.org/EIPS/eip-155) chain ID.
    ///
    /// # Returns
    /// * `RpcResult<U64>` - The chain ID as a U64.
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    /// Get the supported entry points for user operations.
    ///
    /// # Returns
    /// * `RpcResult<Vec<Address>>` - A array of the entry point addresses.
    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;

    /// Send a user operation.
    ///
    /// # Arguments
    /// * `user_operation: UserOperationSigned` - The signed user operation to be sent.
    /// * `entry_point: Address` - The address of the entry point.
    ///
    /// # Returns
    /// * `RpcResult<UserOperationHash>` - The hash of the sent user operation.
    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    /// Estimate the gas required for a user operation.
    ///
    /// # Arguments
    /// * `user_operation: UserOperationRequest` - A user operation with optional gas fields.
    /// * `entry_point: Address` - The address of the entry point.
    ///
    /// # Returns
    /// * `RpcResult<UserOperationGasEstimation>` - The estimated gas limits.
    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationRequest,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation>;

    /// Retrieve the receipt of a user operation.
    ///
    /// # Arguments
    /// * `user_operation_hash: UserOperationHash` - The hash of a user operation.
    ///
    /// # Returns
    /// * `RpcResult<Option<UserOperationReceipt>>` - The receipt, or None if the user operation
    ///   is not included yet.
    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;

    /// Retrieve a user operation by its hash.
    ///
    /// # Arguments
    /// * `user_operation_hash: UserOperationHash` - The hash of the user operation.
    ///
    /// # Returns
    /// * `RpcResult<Option<UserOperationByHash>>` - The user operation with its inclusion data,
    ///   or None if it does not exist.
    #[method(name = "getUserOperationByHash")]
    async fn get_user_operation_by_hash(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationByHash>>;
}

/// ZeroDev bundler extension (`zd` namespace)
#[rpc(client, server, namespace = "zd")]
pub trait ZeroDevBundlerApi {
    /// Gas prices (slow, standard, fast) the bundler accepts for user operations.
    #[method(name = "getUserOperationGasPrice")]
    async fn get_user_operation_gas_price(&self) -> RpcResult<UserOperationGasPrice>;
}
