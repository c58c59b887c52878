use sigil_contracts::ContractError;
use sigil_passkey::PasskeyError;
use sigil_primitives::UserOperationHash;
use sigil_rpc::RpcError;
use std::time::Duration;
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

/// Session error
///
/// Each variant is a failure class the user is told about separately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No account is bound to the session yet
    #[error("no account is bound to the session, register or login first")]
    NotReady,
    /// Another action is running on the session
    #[error("another action is in progress on this session")]
    Busy,
    /// Passkey ceremony or passkey server failure
    #[error("passkey error: {inner}")]
    Credential {
        /// The inner error message
        inner: String,
    },
    /// Account address derivation or chain read failure
    #[error("account binding error: {inner}")]
    AccountBinding {
        /// The inner error message
        inner: String,
    },
    /// Target call could not be encoded
    #[error("call encoding error: {inner}")]
    Encoding {
        /// The inner error message
        inner: String,
    },
    /// Paymaster refused to sponsor the user operation
    #[error("sponsorship rejected: {inner}")]
    Sponsorship {
        /// The inner error message
        inner: String,
    },
    /// Bundler refused the user operation
    #[error("submission rejected: {inner}")]
    Submission {
        /// The inner error message
        inner: String,
    },
    /// Receipt of the user operation could not be queried
    #[error("inclusion query failed for {hash}: {inner}")]
    Inclusion {
        /// The user operation hash
        hash: UserOperationHash,
        /// The inner error message
        inner: String,
    },
    /// User operation was not included in time
    #[error("user operation {hash} was not included within {timeout:?}")]
    InclusionTimeout {
        /// The user operation hash
        hash: UserOperationHash,
        /// How long the receipt was polled for
        timeout: Duration,
    },
    /// Inclusion wait was cancelled
    #[error("stopped waiting for user operation {hash}")]
    Cancelled {
        /// The user operation hash
        hash: UserOperationHash,
    },
}

impl SessionError {
    /// Short name of the failure class
    pub fn class(&self) -> &'static str {
        match self {
            SessionError::NotReady => "not ready",
            SessionError::Busy => "busy",
            SessionError::Credential { .. } => "passkey",
            SessionError::AccountBinding { .. } => "account",
            SessionError::Encoding { .. } => "encoding",
            SessionError::Sponsorship { .. } => "sponsorship",
            SessionError::Submission { .. } => "submission",
            SessionError::Inclusion { .. } => "inclusion",
            SessionError::InclusionTimeout { .. } => "timeout",
            SessionError::Cancelled { .. } => "cancelled",
        }
    }
}

impl From<PasskeyError> for SessionError {
    fn from(err: PasskeyError) -> Self {
        SessionError::Credential { inner: err.to_string() }
    }
}

impl From<ContractError> for SessionError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::UnknownFunction { .. } |
            ContractError::ArgumentCount { .. } |
            ContractError::InvalidArgument { .. } => {
                SessionError::Encoding { inner: err.to_string() }
            }
            _ => SessionError::AccountBinding { inner: err.to_string() },
        }
    }
}

impl SessionError {
    pub(crate) fn sponsorship(err: RpcError) -> Self {
        SessionError::Sponsorship { inner: err.to_string() }
    }

    pub(crate) fn submission(err: RpcError) -> Self {
        SessionError::Submission { inner: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_errors_are_classified() {
        let err: SessionError = ContractError::UnknownFunction { name: "burn".into() }.into();
        assert_eq!(err.class(), "encoding");

        let err: SessionError = ContractError::Provider { inner: "connection refused".into() }.into();
        assert_eq!(err, SessionError::AccountBinding { inner: "provider error: connection refused".into() });
    }

    #[test]
    fn rpc_errors_are_classified() {
        let rpc = RpcError::Call { code: -32501, message: "policy".into(), data: None };
        assert_eq!(SessionError::sponsorship(rpc.clone()).class(), "sponsorship");
        assert_eq!(SessionError::submission(rpc).class(), "submission");
    }
}
