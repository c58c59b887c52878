use crate::utils::parse_address;
use clap::{value_parser, Parser};
use ethers::types::Address;
use expanded_pathbuf::ExpandedPathBuf;
use sigil_primitives::constants::{
    entry_point, kernel,
    passkey::{DEFAULT_ORIGIN, DEFAULT_RP_ID, VALIDATOR},
    session::{CHAIN_ID, INCLUSION_TIMEOUT, POLL_INTERVAL, REQUEST_TIMEOUT},
    tutorial,
};
use sigil_session::WaitConfig;
use std::time::Duration;

/// Endpoints of the services a session talks to
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct ServiceArgs {
    /// Bundler RPC endpoint.
    #[clap(long, env = "BUNDLER_URL")]
    pub bundler_url: String,

    /// Paymaster RPC endpoint.
    #[clap(long, env = "PAYMASTER_URL")]
    pub paymaster_url: String,

    /// Passkey server endpoint.
    #[clap(long, env = "PASSKEY_SERVER_URL")]
    pub passkey_server_url: String,

    /// Ethereum execution client RPC endpoint.
    ///
    /// By default, the bundler endpoint is used.
    #[clap(long, env = "ETH_CLIENT_ADDRESS")]
    pub eth_client_address: Option<String>,

    /// Chain id user operations are submitted on.
    ///
    /// By default, this option is set to Sepolia (`11155111`).
    #[clap(long, env = "CHAIN_ID", default_value_t = CHAIN_ID)]
    pub chain_id: u64,

    /// Timeout of a single request to a service (in seconds).
    #[clap(long, default_value_t = REQUEST_TIMEOUT)]
    pub request_timeout: u64,
}

impl ServiceArgs {
    /// Chain RPC endpoint, falling back to the bundler endpoint
    pub fn eth_client_address(&self) -> &str {
        self.eth_client_address.as_deref().unwrap_or(&self.bundler_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Smart account contracts
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct AccountArgs {
    /// Entry point address.
    #[clap(long, default_value = entry_point::ADDRESS, value_parser=parse_address)]
    pub entry_point: Address,

    /// Kernel factory address.
    #[clap(long, default_value = kernel::FACTORY, value_parser=parse_address)]
    pub kernel_factory: Address,

    /// Factory staker deploying kernels.
    #[clap(long, default_value = kernel::META_FACTORY, value_parser=parse_address)]
    pub meta_factory: Address,

    /// WebAuthn validator address.
    #[clap(long, default_value = VALIDATOR, value_parser=parse_address)]
    pub validator: Address,

    /// Account index (salt).
    #[clap(long, default_value_t = kernel::DEFAULT_INDEX)]
    pub index: u64,
}

/// Software authenticator
#[derive(Debug, Clone, Parser)]
pub struct AuthenticatorArgs {
    /// Relying party id of the passkeys.
    #[clap(long, env = "RP_ID", default_value = DEFAULT_RP_ID)]
    pub rp_id: String,

    /// Origin reported in client data.
    #[clap(long, env = "ORIGIN", default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Path to the keystore file.
    ///
    /// By default, `~/.sigil/passkeys.json` is used.
    #[clap(long)]
    pub keystore: Option<ExpandedPathBuf>,
}

/// Inclusion wait
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct WaitArgs {
    /// Time to wait for inclusion (in seconds).
    #[clap(long, default_value_t = INCLUSION_TIMEOUT)]
    pub inclusion_timeout: u64,

    /// Interval between receipt queries (in milliseconds).
    #[clap(long, default_value_t = POLL_INTERVAL, value_parser = value_parser!(u64).range(1..))]
    pub poll_interval: u64,
}

impl WaitArgs {
    pub fn config(&self) -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_secs(self.inclusion_timeout),
            poll_interval: Duration::from_millis(self.poll_interval),
        }
    }
}

/// Everything needed to run a session
#[derive(Debug, Clone, Parser)]
pub struct SessionArgs {
    #[clap(flatten)]
    pub services: ServiceArgs,

    #[clap(flatten)]
    pub account: AccountArgs,

    #[clap(flatten)]
    pub authenticator: AuthenticatorArgs,

    #[clap(flatten)]
    pub wait: WaitArgs,
}

/// Contract called by submitted user operations
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct TargetArgs {
    /// Target contract address.
    #[clap(long, default_value = tutorial::CONTRACT, value_parser=parse_address)]
    pub target: Address,

    /// Human readable function signatures of the target (repeatable).
    ///
    /// By default, the tutorial NFT ABI is used.
    #[clap(long = "abi")]
    pub abi: Vec<String>,

    /// Function to call.
    #[clap(long, default_value = tutorial::FUNCTION)]
    pub function: String,
}

impl TargetArgs {
    pub fn signatures(&self) -> Vec<String> {
        if self.abi.is_empty() {
            tutorial::ABI.iter().map(|s| s.to_string()).collect()
        } else {
            self.abi.clone()
        }
    }
}
