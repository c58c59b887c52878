//! Account abstraction (ERC-4337) primitive types
//!
//! This crate contains the entry point v0.7 user operation type, its hashing, the JSON-RPC
//! payloads exchanged with bundlers and paymasters, and the passkey key material shared by the
//! rest of the workspace.

pub mod call;
pub mod chain;
pub mod constants;
pub mod provider;
mod user_operation;
pub mod utils;
pub mod webauthn;

pub use call::Call;
pub use user_operation::{
    PackedUserOperation, SponsorUserOperationResult, UserOperationByHash,
    UserOperationGasEstimation, UserOperationGasPrice, UserOperationHash, UserOperationRequest,
    UserOperationReceipt, UserOperationSigned, GasPriceTier,
};
pub use utils::{get_address, pack_uint128, unpack_uint128};
pub use webauthn::WebAuthnKey;
