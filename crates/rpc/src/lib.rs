//! JSON-RPC clients of the services a passkey session submits user operations through: an
//! ERC-4337 bundler (with the ZeroDev gas price extension) and a ZeroDev paymaster.

mod bundler;
pub mod bundler_api;
mod error;
mod paymaster;
pub mod paymaster_api;

pub use bundler::BundlerClient;
pub use bundler_api::{BundlerApiServer, ZeroDevBundlerApiServer};
pub use error::{kind as error_kind, RpcError};
pub use paymaster::PaymasterClient;
pub use paymaster_api::{PaymasterApiServer, SponsorUserOperationRequest};
