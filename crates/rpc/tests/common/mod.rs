use async_trait::async_trait;
use ethers::types::{Address, TransactionReceipt, U256, U64};
use jsonrpsee::{
    core::RpcResult,
    server::{Server, ServerHandle},
    types::ErrorObjectOwned,
    RpcModule,
};
use parking_lot::Mutex;
use sigil_primitives::{
    constants::rpc_error_codes::PAYMASTER, GasPriceTier, SponsorUserOperationResult,
    UserOperationByHash, UserOperationGasEstimation, UserOperationGasPrice, UserOperationHash,
    UserOperationReceipt, UserOperationRequest, UserOperationSigned,
};
use sigil_rpc::{
    BundlerApiServer, PaymasterApiServer, SponsorUserOperationRequest, ZeroDevBundlerApiServer,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Bundler answering with fixed values and recording submitted user operations
#[derive(Clone, Default)]
pub struct MockBundler {
    pub hash: UserOperationHash,
    pub included: bool,
    pub reject: Option<(i32, String)>,
    pub sent: Arc<Mutex<Vec<(UserOperationSigned, Address)>>>,
}

pub fn gas_price() -> UserOperationGasPrice {
    let tier = |fee: u64| GasPriceTier {
        max_fee_per_gas: fee.into(),
        max_priority_fee_per_gas: (fee / 10).into(),
    };
    UserOperationGasPrice { slow: tier(1_000), standard: tier(2_000), fast: tier(3_000) }
}

#[async_trait]
impl BundlerApiServer for MockBundler {
    async fn chain_id(&self) -> RpcResult<U64> {
        Ok(11_155_111u64.into())
    }

    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>> {
        Ok(vec![sigil_primitives::constants::entry_point::ADDRESS.parse().unwrap()])
    }

    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash> {
        if let Some((code, message)) = &self.reject {
            return Err(ErrorObjectOwned::owned(*code, message.clone(), None::<bool>));
        }
        self.sent.lock().push((user_operation, entry_point));
        Ok(self.hash)
    }

    async fn estimate_user_operation_gas(
        &self,
        _user_operation: UserOperationRequest,
        _entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation> {
        Ok(UserOperationGasEstimation {
            pre_verification_gas: 50_000.into(),
            verification_gas_limit: 200_000.into(),
            call_gas_limit: 100_000.into(),
            ..Default::default()
        })
    }

    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>> {
        if !self.included || user_operation_hash != self.hash {
            return Ok(None);
        }
        Ok(Some(UserOperationReceipt {
            user_operation_hash,
            entry_point: None,
            sender: Address::repeat_byte(0x11),
            nonce: U256::zero(),
            paymaster: None,
            actual_gas_cost: 1.into(),
            actual_gas_used: 1.into(),
            success: true,
            reason: String::new(),
            logs: vec![],
            tx_receipt: TransactionReceipt::default(),
        }))
    }

    async fn get_user_operation_by_hash(
        &self,
        _user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationByHash>> {
        Ok(None)
    }
}

#[async_trait]
impl ZeroDevBundlerApiServer for MockBundler {
    async fn get_user_operation_gas_price(&self) -> RpcResult<UserOperationGasPrice> {
        Ok(gas_price())
    }
}

/// Paymaster sponsoring everything (or nothing) and recording requests
#[derive(Clone, Default)]
pub struct MockPaymaster {
    pub reject: bool,
    pub requests: Arc<Mutex<Vec<SponsorUserOperationRequest>>>,
}

pub fn sponsorship() -> SponsorUserOperationResult {
    SponsorUserOperationResult {
        paymaster: Address::repeat_byte(0x22),
        paymaster_data: "0x0102".parse().unwrap(),
        paymaster_verification_gas_limit: 30_000.into(),
        paymaster_post_op_gas_limit: 10_000.into(),
        call_gas_limit: 100_000.into(),
        verification_gas_limit: 200_000.into(),
        pre_verification_gas: 50_000.into(),
        max_fee_per_gas: None,
        max_priority_fee_per_gas: None,
    }
}

#[async_trait]
impl PaymasterApiServer for MockPaymaster {
    async fn sponsor_user_operation(
        &self,
        request: SponsorUserOperationRequest,
    ) -> RpcResult<SponsorUserOperationResult> {
        self.requests.lock().push(request);
        if self.reject {
            return Err(ErrorObjectOwned::owned(PAYMASTER, "policy rejected", None::<bool>));
        }
        Ok(sponsorship())
    }
}

/// Starts a JSON-RPC server on a free local port
pub async fn start_server<T: Send + Sync + 'static>(
    module: RpcModule<T>,
) -> eyre::Result<(String, ServerHandle)> {
    let server = Server::builder().build("127.0.0.1:0").await?;
    let addr: SocketAddr = server.local_addr()?;
    let handle = server.start(module);
    Ok((format!("http://{addr}"), handle))
}

pub async fn start_bundler(bundler: MockBundler) -> eyre::Result<(String, ServerHandle)> {
    let mut module = BundlerApiServer::into_rpc(bundler.clone());
    module.merge(ZeroDevBundlerApiServer::into_rpc(bundler))?;
    start_server(module).await
}
