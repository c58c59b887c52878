//! Smart contract interfaces used by passkey sessions: the ERC-4337 entry point (v0.7), the
//! Kernel smart account with its factories, and arbitrary target contracts described by a
//! human-readable ABI.

pub mod entry_point;
mod error;
mod gen;
pub mod kernel;
pub mod target;

pub use entry_point::EntryPoint;
pub use error::{decode_revert_string, ContractError};
pub use kernel::KernelFactory;
pub use target::TargetContract;
