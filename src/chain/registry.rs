/// Chain ID -> public RPC endpoint lookup
/// The built-in table can be extended or overridden from the config file

use std::collections::BTreeMap;

use crate::config::ChainEntry;
use crate::error::{Result, TransferError};

/// Public RPC endpoints shipped with the tool
pub const DEFAULT_CHAINS: &[(u64, &str)] = &[
    (1, "https://go.getblock.io/6db279c1e07c481da0785c453b4c5de1"),
    (10, "https://mainnet.optimism.io"),
    (56, "https://bsc-dataseed.binance.org"),
    (137, "https://polygon-rpc.com"),
    (42161, "https://arb1.arbitrum.io/rpc"),
    (8453, "https://mainnet.base.org"),
    (43114, "https://api.avax.network/ext/bc/C/rpc"),
    (250, "https://rpc.ftm.tools"),
    (100, "https://rpc.gnosischain.com"),
    (324, "https://mainnet.era.zksync.io"),
    (59144, "https://rpc.linea.build"),
    (534352, "https://rpc.scroll.io"),
    (5000, "https://rpc.mantle.xyz"),
    (81457, "https://rpc.blast.io"),
    // Testnets
    (11155111, "https://rpc.sepolia.org"),
    (17000, "https://ethereum-holesky.publicnode.com"),
];

#[derive(Debug, Clone)]
pub struct ChainRegistry {
    endpoints: BTreeMap<u64, String>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_CHAINS
                .iter()
                .map(|(id, url)| ChainEntry { chain_id: *id, rpc_url: url.to_string() }),
        )
    }
}

impl ChainRegistry {
    /// Registry containing only the given entries
    pub fn from_entries(entries: impl IntoIterator<Item = ChainEntry>) -> Self {
        let endpoints = entries
            .into_iter()
            .map(|entry| (entry.chain_id, entry.rpc_url))
            .collect();
        Self { endpoints }
    }

    /// Built-in table with `overrides` applied on top. Later entries win.
    pub fn with_overrides(overrides: &[ChainEntry]) -> Self {
        let mut registry = Self::default();
        for entry in overrides {
            registry.endpoints.insert(entry.chain_id, entry.rpc_url.clone());
        }
        registry
    }

    pub fn resolve(&self, chain_id: u64) -> Result<&str> {
        self.endpoints
            .get(&chain_id)
            .map(String::as_str)
            .ok_or_else(|| TransferError::UnknownChain {
                chain_id,
                supported: self.supported(),
            })
    }

    pub fn supported(&self) -> Vec<u64> {
        self.endpoints.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_default_chains_resolve() {
        let registry = ChainRegistry::default();
        for (id, url) in DEFAULT_CHAINS {
            let resolved = registry.resolve(*id).unwrap();
            assert!(!resolved.is_empty());
            assert_eq!(resolved, *url);
        }
        assert_eq!(registry.supported().len(), DEFAULT_CHAINS.len());
    }

    #[test]
    fn test_unknown_chain() {
        let registry = ChainRegistry::default();
        for id in [0u64, 2, 31337, u64::MAX] {
            match registry.resolve(id) {
                Err(TransferError::UnknownChain { chain_id, supported }) => {
                    assert_eq!(chain_id, id);
                    assert!(supported.contains(&1));
                }
                other => panic!("expected UnknownChain, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let registry = ChainRegistry::with_overrides(&[
            ChainEntry { chain_id: 1, rpc_url: "https://eth.example.org".to_string() },
            ChainEntry { chain_id: 31337, rpc_url: "http://127.0.0.1:8545".to_string() },
        ]);

        assert_eq!(registry.resolve(1).unwrap(), "https://eth.example.org");
        assert_eq!(registry.resolve(31337).unwrap(), "http://127.0.0.1:8545");
        assert_eq!(registry.resolve(10).unwrap(), "https://mainnet.optimism.io");
    }
}
