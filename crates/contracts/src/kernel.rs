//! Kernel v3.1 smart account encodings

pub use super::gen::{FactoryStakerAPI, KernelAPI, KernelFactoryAPI};
use super::gen::{factory_staker_api::DeployWithFactoryCall, kernel_api};
use crate::error::ContractError;
use ethers::{
    abi::{self, AbiEncode, Token},
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use sigil_primitives::{constants::kernel::VALIDATION_TYPE_VALIDATOR, Call};
use std::sync::Arc;

/// Execution mode of a single call
pub const CALL_TYPE_SINGLE: u8 = 0x00;
/// Execution mode of a batch of calls
pub const CALL_TYPE_BATCH: u8 = 0x01;

/// Validation id of the root validator (`0x01 ‖ validator`)
pub fn root_validator_id(validator: Address) -> [u8; 21] {
    let mut id = [0u8; 21];
    id[0] = VALIDATION_TYPE_VALIDATOR;
    id[1..].copy_from_slice(validator.as_bytes());
    id
}

/// Nonce key (uint192) selecting the root validator: `mode ‖ type ‖ validator ‖ key`
pub fn root_nonce_key(validator: Address) -> U256 {
    let mut key = [0u8; 24];
    key[2..22].copy_from_slice(validator.as_bytes());
    U256::from_big_endian(&key)
}

/// CREATE2 salt derived from the account index
pub fn salt(index: u64) -> [u8; 32] {
    let mut salt = [0u8; 32];
    U256::from(index).to_big_endian(&mut salt);
    salt
}

/// `initialize` call installing the validator as root, without hook or extra config
pub fn initialize_data(validator: Address, validator_data: Bytes) -> Bytes {
    kernel_api::InitializeCall {
        root_validator: root_validator_id(validator),
        hook: Address::zero(),
        validator_data,
        hook_data: Bytes::default(),
        init_config: vec![],
    }
    .encode()
    .into()
}

/// Factory data for the factory staker, which forwards deployment to the kernel factory
pub fn deploy_with_factory_data(kernel_factory: Address, init_data: Bytes, index: u64) -> Bytes {
    DeployWithFactoryCall { factory: kernel_factory, create_data: init_data, salt: salt(index) }
        .encode()
        .into()
}

/// Encodes calls into `execute` call data
///
/// A single call is packed as `target ‖ value ‖ data`; several calls are ABI-encoded as an
/// `Execution[]` array under the batch mode.
pub fn encode_execute(calls: &[Call]) -> Bytes {
    let (exec_mode, execution_calldata) = match calls {
        [call] => {
            let mut value = [0u8; 32];
            call.value.to_big_endian(&mut value);
            ([0u8; 32], [call.to.as_bytes(), &value[..], &call.data[..]].concat())
        }
        calls => {
            let mut mode = [0u8; 32];
            mode[0] = CALL_TYPE_BATCH;
            let executions = calls
                .iter()
                .map(|call| {
                    Token::Tuple(vec![
                        Token::Address(call.to),
                        Token::Uint(call.value),
                        Token::Bytes(call.data.to_vec()),
                    ])
                })
                .collect();
            (mode, abi::encode(&[Token::Array(executions)]))
        }
    };

    kernel_api::ExecuteCall { exec_mode, execution_calldata: execution_calldata.into() }
        .encode()
        .into()
}

/// Kernel factory (account address derivation)
#[derive(Clone)]
pub struct KernelFactory<M: Middleware + 'static> {
    address: Address,
    kernel_factory_api: KernelFactoryAPI<M>,
}

impl<M: Middleware + 'static> KernelFactory<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        Self { address, kernel_factory_api: KernelFactoryAPI::new(address, eth_client) }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Counterfactual address of the account created with `init_data` and the index salt
    pub async fn get_address(
        &self,
        init_data: Bytes,
        index: u64,
    ) -> Result<Address, ContractError> {
        self.kernel_factory_api
            .get_address(init_data, salt(index))
            .call()
            .await
            .map_err(ContractError::from_contract_error)
    }
}
