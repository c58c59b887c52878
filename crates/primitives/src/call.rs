//! Call executed by a smart account

use crate::utils::as_checksum_addr;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Single call executed by the smart account on behalf of the user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Target contract
    #[serde(serialize_with = "as_checksum_addr")]
    pub to: Address,
    /// Native value sent along with the call
    #[serde(default)]
    pub value: U256,
    /// ABI-encoded call data
    #[serde(default)]
    pub data: Bytes,
}

impl Call {
    pub fn new(to: Address, data: Bytes) -> Self {
        Self { to, value: U256::zero(), data }
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}
