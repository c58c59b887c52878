use jsonrpsee::{core::ClientError, types::ErrorObjectOwned};
use sigil_primitives::constants::rpc_error_codes::{
    ENTITY_BANNED_OR_THROTTLED, EXECUTION, EXPIRATION, OPCODE, PAYMASTER, SIGNATURE,
    SIGNATURE_AGGREGATOR, STAKE_TOO_LOW, VALIDATION,
};
use thiserror::Error;

/// Errors of the bundler and paymaster clients
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The endpoint answered with a JSON-RPC error object
    #[error("{} ({code}): {message}", kind(*.code))]
    Call {
        /// JSON-RPC error code
        code: i32,
        /// Error message
        message: String,
        /// Optional error data
        data: Option<String>,
    },

    /// The endpoint could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint did not answer in time
    #[error("request timeout")]
    Timeout,

    /// The response could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Endpoint URL is invalid or client could not be built
    #[error("invalid endpoint {url}: {inner}")]
    Endpoint {
        /// Endpoint URL
        url: String,
        /// The inner error message
        inner: String,
    },
}

/// Human-readable class of an ERC-4337 bundler error code
pub fn kind(code: i32) -> &'static str {
    match code {
        VALIDATION => "user operation validation failed",
        PAYMASTER => "paymaster rejected user operation",
        OPCODE => "banned opcode",
        EXPIRATION => "user operation expired",
        ENTITY_BANNED_OR_THROTTLED => "entity banned or throttled",
        STAKE_TOO_LOW => "stake too low",
        SIGNATURE_AGGREGATOR => "unsupported signature aggregator",
        SIGNATURE => "invalid signature",
        EXECUTION => "execution reverted",
        _ => "rpc error",
    }
}

impl From<ErrorObjectOwned> for RpcError {
    fn from(err: ErrorObjectOwned) -> Self {
        RpcError::Call {
            code: err.code(),
            message: err.message().to_string(),
            data: err.data().map(|data| data.get().to_string()),
        }
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Call(err) => err.into(),
            ClientError::RequestTimeout => RpcError::Timeout,
            ClientError::ParseError(err) => RpcError::Parse(err.to_string()),
            ClientError::Transport(err) => RpcError::Transport(err.to_string()),
            err => RpcError::Transport(err.to_string()),
        }
    }
}
