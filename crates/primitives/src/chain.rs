//! Chain extensions
use alloy_chains::{Chain, NamedChain};

pub trait ChainExt {
    /// Network name used by the user operation explorer
    fn explorer_network(&self) -> String;

    /// Whether the chain ships the RIP-7212 secp256r1 verification precompile
    fn supports_p256_precompile(&self) -> bool;
}

impl ChainExt for Chain {
    fn explorer_network(&self) -> String {
        match self.named() {
            Some(NamedChain::Mainnet) => "mainnet",
            Some(NamedChain::Sepolia) => "sepolia",
            Some(NamedChain::Holesky) => "holesky",
            Some(NamedChain::Polygon) => "matic",
            Some(NamedChain::PolygonMumbai) => "mumbai",
            Some(NamedChain::PolygonAmoy) => "amoy",
            Some(NamedChain::Optimism) => "optimism",
            Some(NamedChain::OptimismSepolia) => "optimism-sepolia",
            Some(NamedChain::Arbitrum) => "arbitrum-one",
            Some(NamedChain::ArbitrumSepolia) => "arbitrum-sepolia",
            Some(NamedChain::Base) => "base",
            Some(NamedChain::BaseSepolia) => "base-sepolia",
            _ => return self.id().to_string(),
        }
        .into()
    }

    fn supports_p256_precompile(&self) -> bool {
        matches!(
            self.named(),
            Some(
                NamedChain::Polygon
                    | NamedChain::PolygonAmoy
                    | NamedChain::Optimism
                    | NamedChain::OptimismSepolia
                    | NamedChain::Base
                    | NamedChain::BaseSepolia
                    | NamedChain::Arbitrum
                    | NamedChain::ArbitrumSepolia
            )
        )
    }
}
