//! Texts shown to the user

use crate::error::SessionError;
use alloy_chains::Chain;
use ethers::types::Address;
use sigil_primitives::{chain::ChainExt, constants::explorer::BASE_URL, UserOperationHash};
use std::fmt;

/// Block explorer page of a smart account
pub fn account_link(address: &Address, chain: &Chain) -> String {
    format!("{BASE_URL}/account/{address:?}?network={}", chain.explorer_network())
}

/// Block explorer page of a user operation
pub fn explorer_link(hash: &UserOperationHash, chain: &Chain) -> String {
    format!("{BASE_URL}/userOpHash/{hash}?network={}", chain.explorer_network())
}

/// Submission status of the session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Sending,
    Completed {
        hash: UserOperationHash,
        link: String,
    },
    Failed {
        error: SessionError,
    },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => Ok(()),
            Status::Sending => write!(f, "Sending UserOp..."),
            Status::Completed { link, .. } => write!(f, "UserOp completed. Click here to view: {link}"),
            Status::Failed { error } => write!(f, "UserOp failed ({}): {error}", error.class()),
        }
    }
}

/// Session action the user triggered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Register => write!(f, "Register"),
            Action::Login => write!(f, "Login"),
        }
    }
}

/// Outcome of a register or login action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Done(Action),
    Failed(Action, SessionError),
}

impl Notice {
    pub fn new<T>(action: Action, res: &Result<T, SessionError>) -> Self {
        match res {
            Ok(_) => Notice::Done(action),
            Err(err) => Notice::Failed(action, err.clone()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Done(action) => write!(f, "{action} done. Try sending UserOps."),
            Notice::Failed(action, err) => write!(f, "{action} failed ({}): {err}", err.class()),
        }
    }
}
