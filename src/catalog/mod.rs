// Token catalog module
// Read-only registry mapping token symbol -> chain -> contract address,
// plus the mediator lists the routing strategies walk through
//
// Numan Thabit 2025 Nov

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("tokens.yaml");

/// Decimals assumed for contracts that are not in the catalog. Routing never
/// depends on decimals since amounts travel in base units.
pub const DEFAULT_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub symbol: String,
    pub chain_id: u64,
    pub address: String,
    pub decimals: u8,
}

impl Token {
    /// Same on-chain asset, regardless of the catalog label.
    pub fn same_address(&self, other: &Token) -> bool {
        self.chain_id == other.chain_id && self.address.eq_ignore_ascii_case(&other.address)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    stablecoins: Vec<String>,
    #[serde(default)]
    natives: BTreeMap<u64, Vec<String>>,
    tokens: Vec<TokenEntry>,
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    symbol: String,
    deployments: Vec<Deployment>,
}

#[derive(Debug, Deserialize)]
struct Deployment {
    chain: u64,
    address: String,
    decimals: u8,
}

/// Immutable token registry, constructed once and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TokenCatalog {
    /// Per-chain tokens in catalog order
    by_chain: HashMap<u64, Vec<Token>>,
    /// Stablecoin mediators in priority order
    stablecoins: Vec<String>,
    /// Gas-token family per chain in priority order
    natives: HashMap<u64, Vec<String>>,
}

impl TokenCatalog {
    /// Catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG).context("parse built-in token catalog")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read token catalog {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("parse token catalog {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(raw).context("decode catalog YAML")?;

        let mut by_chain: HashMap<u64, Vec<Token>> = HashMap::new();
        for entry in file.tokens {
            let symbol = entry.symbol.trim().to_ascii_uppercase();
            ensure!(!symbol.is_empty(), "token with empty symbol");
            for dep in entry.deployments {
                ensure!(
                    is_evm_address(&dep.address),
                    "token {symbol} on chain {} has malformed address {}",
                    dep.chain,
                    dep.address
                );
                let tokens = by_chain.entry(dep.chain).or_default();
                if tokens.iter().any(|t| t.symbol == symbol) {
                    bail!("token {symbol} listed twice on chain {}", dep.chain);
                }
                tokens.push(Token {
                    symbol: symbol.clone(),
                    chain_id: dep.chain,
                    address: dep.address,
                    decimals: dep.decimals,
                });
            }
        }

        let stablecoins = file
            .stablecoins
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .collect();
        let natives = file
            .natives
            .into_iter()
            .map(|(chain, family)| {
                let family = family
                    .iter()
                    .map(|s| s.trim().to_ascii_uppercase())
                    .collect();
                (chain, family)
            })
            .collect();

        debug!(chains = by_chain.len(), "token catalog loaded");
        Ok(Self {
            by_chain,
            stablecoins,
            natives,
        })
    }

    pub fn supports_chain(&self, chain_id: u64) -> bool {
        self.by_chain.contains_key(&chain_id)
    }

    pub fn chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.by_chain.keys().copied().collect();
        chains.sort_unstable();
        chains
    }

    pub fn tokens_on(&self, chain_id: u64) -> &[Token] {
        self.by_chain
            .get(&chain_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Case-insensitive symbol lookup on one chain.
    pub fn resolve(&self, symbol: &str, chain_id: u64) -> Option<&Token> {
        let symbol = symbol.trim();
        self.tokens_on(chain_id)
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// First catalog entry deployed at `address` on the chain.
    pub fn find_by_address(&self, address: &str, chain_id: u64) -> Option<&Token> {
        let address = address.trim();
        self.tokens_on(chain_id)
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(address))
    }

    /// Resolve user input that is either a catalog symbol or a contract
    /// address. Addresses missing from the catalog become ad-hoc tokens
    /// labelled by their address.
    pub fn lookup(&self, input: &str, chain_id: u64) -> Option<Token> {
        let input = input.trim();
        if is_evm_address(input) {
            if let Some(token) = self.find_by_address(input, chain_id) {
                return Some(token.clone());
            }
            return Some(Token {
                symbol: input.to_ascii_lowercase(),
                chain_id,
                address: input.to_string(),
                decimals: DEFAULT_DECIMALS,
            });
        }
        self.resolve(input, chain_id).cloned()
    }

    /// Intermediate candidates on a chain: every catalog entry except the
    /// excluded endpoints. Entries are compared by identity (symbol on the
    /// chain), so distinct symbols sharing one address are all kept.
    pub fn candidates(&self, chain_id: u64, exclude: &[&Token]) -> Vec<&Token> {
        self.tokens_on(chain_id)
            .iter()
            .filter(|t| !exclude.iter().any(|e| e.symbol == t.symbol))
            .collect()
    }

    pub fn stablecoins(&self) -> &[String] {
        &self.stablecoins
    }

    pub fn native_family(&self, chain_id: u64) -> &[String] {
        self.natives
            .get(&chain_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// `0x` followed by exactly 20 hex-encoded bytes.
pub fn is_evm_address(raw: &str) -> bool {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIASED: &str = r#"
stablecoins: [usdt]
natives:
  56: [BNB, WBNB]
tokens:
  - symbol: TWC
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000001", decimals: 18 }
  - symbol: BTCB
    deployments:
      - { chain: 56, address: "0x00000000000000000000000000000000000000b7", decimals: 18 }
  - symbol: WBTC
    deployments:
      - { chain: 56, address: "0x00000000000000000000000000000000000000B7", decimals: 18 }
  - symbol: USDT
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000003", decimals: 18 }
"#;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = TokenCatalog::builtin().expect("builtin catalog");
        assert_eq!(catalog.chains(), vec![1, 56, 137, 42161]);
        assert_eq!(catalog.stablecoins(), ["USDT", "USDC", "DAI"]);
        assert_eq!(catalog.native_family(56), ["BNB", "WBNB"]);

        let usdc_eth = catalog.resolve("usdc", 1).unwrap();
        let usdc_bsc = catalog.resolve("USDC", 56).unwrap();
        assert_eq!(usdc_eth.decimals, 6);
        assert_eq!(usdc_bsc.decimals, 18);
        assert_ne!(usdc_eth.address, usdc_bsc.address);
    }

    #[test]
    fn symbol_undefined_on_chain_is_absent() {
        let catalog = TokenCatalog::builtin().unwrap();
        assert!(catalog.resolve("WBNB", 1).is_none());
        assert!(catalog.resolve("WBNB", 56).is_some());
        assert!(catalog.tokens_on(999).is_empty());
        assert!(!catalog.supports_chain(999));
    }

    #[test]
    fn lookup_accepts_symbols_and_addresses() {
        let catalog = TokenCatalog::from_yaml_str(ALIASED).unwrap();
        let by_symbol = catalog.lookup("twc", 56).unwrap();
        let by_address = catalog
            .lookup("0x0000000000000000000000000000000000000001", 56)
            .unwrap();
        assert_eq!(by_symbol, by_address);

        let adhoc = catalog
            .lookup("0x00000000000000000000000000000000000000Ff", 56)
            .unwrap();
        assert_eq!(adhoc.symbol, "0x00000000000000000000000000000000000000ff");
        assert_eq!(adhoc.decimals, DEFAULT_DECIMALS);

        assert!(catalog.lookup("NOPE", 56).is_none());
        assert!(catalog.lookup("0x1234", 56).is_none());
    }

    #[test]
    fn candidates_keep_aliases_and_drop_endpoints() {
        let catalog = TokenCatalog::from_yaml_str(ALIASED).unwrap();
        let twc = catalog.resolve("TWC", 56).unwrap();
        let usdt = catalog.resolve("USDT", 56).unwrap();

        let candidates: Vec<&str> = catalog
            .candidates(56, &[twc, usdt])
            .into_iter()
            .map(|t| t.symbol.as_str())
            .collect();
        assert_eq!(candidates, ["BTCB", "WBTC"]);

        let btcb = catalog.resolve("BTCB", 56).unwrap();
        let wbtc = catalog.resolve("WBTC", 56).unwrap();
        assert!(btcb.same_address(wbtc));
        assert_ne!(btcb, wbtc);
    }

    #[test]
    fn mediator_lists_are_normalised() {
        let catalog = TokenCatalog::from_yaml_str(ALIASED).unwrap();
        assert_eq!(catalog.stablecoins(), ["USDT"]);
        assert!(catalog.native_family(1).is_empty());
    }

    #[test]
    fn rejects_malformed_catalogs() {
        let bad_address = r#"
tokens:
  - symbol: X
    deployments:
      - { chain: 1, address: "0xnothex", decimals: 18 }
"#;
        assert!(TokenCatalog::from_yaml_str(bad_address).is_err());

        let duplicate = r#"
tokens:
  - symbol: X
    deployments:
      - { chain: 1, address: "0x0000000000000000000000000000000000000001", decimals: 18 }
  - symbol: x
    deployments:
      - { chain: 1, address: "0x0000000000000000000000000000000000000002", decimals: 18 }
"#;
        assert!(TokenCatalog::from_yaml_str(duplicate).is_err());
    }

    #[test]
    fn address_shape() {
        assert!(is_evm_address("0xdAC17F958D2ee523a2206206994597C13D831ec7"));
        assert!(!is_evm_address("dAC17F958D2ee523a2206206994597C13D831ec7"));
        assert!(!is_evm_address("0xdAC17F958D2ee523a2206206994597C13D831ec"));
        assert!(!is_evm_address("0xZZC17F958D2ee523a2206206994597C13D831ec7"));
    }
}
