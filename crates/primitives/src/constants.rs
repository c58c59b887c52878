//! Account abstraction (ERC-4337) and passkey session constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";
    /// Version of the entry point smart contract
    pub const VERSION: &str = "0.7.0";
}

/// Kernel smart account (v3.1)
pub mod kernel {
    /// Version of the kernel smart account
    pub const VERSION: &str = "0.3.1";
    /// Kernel factory (address derivation and account creation)
    pub const FACTORY: &str = "0xaac5D4240AF87249B3f71BC8E4A2cae074A3E419";
    /// Factory staker that deploys kernels through an approved factory
    pub const META_FACTORY: &str = "0xd703aaE79538628d27099B8c4f621bE4CCd142d5";
    /// Validation type of a plain validator module (first byte of a validation id)
    pub const VALIDATION_TYPE_VALIDATOR: u8 = 0x01;
    /// Default account index (CREATE2 salt)
    pub const DEFAULT_INDEX: u64 = 0;
}

/// Passkey (WebAuthn) validator and software authenticator
pub mod passkey {
    /// Address of the WebAuthn validator module (v0.0.2)
    pub const VALIDATOR: &str = "0x7ab16Ff354AcB328452F1D445b3Ddee9a91e9e69";
    /// Relying party id used by the software authenticator
    pub const DEFAULT_RP_ID: &str = "localhost";
    /// Origin reported in client data by the software authenticator
    pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
    /// Keystore file name inside the data directory
    pub const KEYSTORE_FILE: &str = "passkeys.json";
    /// COSE algorithm identifier for ES256
    pub const COSE_ALG_ES256: i64 = -7;
}

/// Tutorial NFT contract targeted by default
pub mod tutorial {
    /// Address of the NFT contract
    pub const CONTRACT: &str = "0x34bE7f35132E97915633BC1fc020364EA5134863";
    /// Human readable ABI of the NFT contract
    pub const ABI: &[&str] = &[
        "function mint(address _to) public",
        "function balanceOf(address owner) external view returns (uint256 balance)",
    ];
    /// Function called when no other function is requested
    pub const FUNCTION: &str = "mint";
}

/// Block explorer for user operations
pub mod explorer {
    pub const BASE_URL: &str = "https://jiffyscan.xyz";
}

/// Session defaults
pub mod session {
    /// Default chain (Sepolia)
    pub const CHAIN_ID: u64 = 11_155_111;
    /// Time to wait for user operation inclusion (in seconds)
    pub const INCLUSION_TIMEOUT: u64 = 180;
    /// Interval between receipt queries (in milliseconds)
    pub const POLL_INTERVAL: u64 = 2_000;
    /// Timeout of a single request to an external service (in seconds)
    pub const REQUEST_TIMEOUT: u64 = 30;
    /// Name of the data directory inside the home directory
    pub const DATA_DIR: &str = ".sigil";
}

/// Bundler RPC error codes
pub mod rpc_error_codes {
    pub const VALIDATION: i32 = -32500;
    pub const PAYMASTER: i32 = -32501;
    pub const OPCODE: i32 = -32502;
    pub const EXPIRATION: i32 = -32503;
    pub const ENTITY_BANNED_OR_THROTTLED: i32 = -32504;
    pub const STAKE_TOO_LOW: i32 = -32505;
    pub const SIGNATURE_AGGREGATOR: i32 = -32506;
    pub const SIGNATURE: i32 = -32507;
    pub const EXECUTION: i32 = -32521;
}
