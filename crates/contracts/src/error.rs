use crate::gen::EntryPointAPIErrors;
use ethers::{
    abi::AbiDecode,
    contract::ContractError as EthersContractError,
    providers::{Middleware, MiddlewareError},
    types::Bytes,
};
use thiserror::Error;

/// Errors of contract reads and call encoding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The call reverted
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// ABI error
    #[error("abi error: {inner}")]
    ABI {
        /// The inner error message
        inner: String,
    },

    /// Data decoding error
    #[error("decode error: {inner}")]
    Decode {
        /// The inner error message
        inner: String,
    },

    /// Function is not part of the contract ABI
    #[error("function {name} not found in contract abi")]
    UnknownFunction {
        /// Name of the requested function
        name: String,
    },

    /// Wrong number of arguments for the function
    #[error("function {function} expects {expected} arguments, got {got}")]
    ArgumentCount {
        /// Function name
        function: String,
        /// Number of inputs in the ABI
        expected: usize,
        /// Number of supplied arguments
        got: usize,
    },

    /// Argument could not be converted to the parameter type
    #[error("argument {index} ({value:?}) is not a valid {kind}: {inner}")]
    InvalidArgument {
        /// Position of the argument
        index: usize,
        /// Supplied value
        value: String,
        /// Solidity type of the parameter
        kind: String,
        /// The inner error message
        inner: String,
    },
}

impl ContractError {
    pub fn from_contract_error<M: Middleware>(err: EthersContractError<M>) -> Self {
        match err {
            EthersContractError::DecodingError(e) => Self::Decode { inner: e.to_string() },
            EthersContractError::AbiError(e) => Self::ABI { inner: e.to_string() },
            EthersContractError::MiddlewareError { e } => Self::from_middleware_error::<M>(e),
            EthersContractError::ProviderError { e } => Self::Provider { inner: e.to_string() },
            EthersContractError::Revert(data) => Self::from_revert_data(data),
            _ => Self::Provider { inner: err.to_string() },
        }
    }

    pub fn from_middleware_error<M: Middleware>(err: M::Error) -> Self {
        if let Some(data) = err.as_error_response().and_then(|e| e.as_revert_data()) {
            return Self::from_revert_data(data);
        }
        Self::Provider { inner: err.to_string() }
    }

    fn from_revert_data(data: Bytes) -> Self {
        match EntryPointAPIErrors::decode(data.as_ref()) {
            Ok(EntryPointAPIErrors::FailedOp(op)) => Self::ExecutionReverted(op.reason),
            Ok(EntryPointAPIErrors::FailedOpWithRevert(op)) => Self::ExecutionReverted(op.reason),
            Ok(EntryPointAPIErrors::RevertString(reason)) => Self::ExecutionReverted(reason),
            Err(_) => match decode_revert_string(data.clone()) {
                Some(reason) => Self::ExecutionReverted(reason),
                None => Self::ExecutionReverted(data.to_string()),
            },
        }
    }
}

// ethers-rs could not handle `require (true, "reason")` or `revert("test failed")` well in this
// case revert with `require` error would ends up with error event signature `0x08c379a0`
// we need to handle it manually
pub fn decode_revert_string(data: Bytes) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (error_sig, reason) = data.split_at(4);
    if error_sig == [0x08, 0xc3, 0x79, 0xa0] {
        <String as AbiDecode>::decode(reason).ok()
    } else {
        None
    }
}
