//! Run configuration

use std::fmt;
use std::str::FromStr;

use log::LevelFilter;

use crate::errors::{GeneratorError, GeneratorResult};

pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Known clusters with public endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Mainnet,
    Devnet,
    Testnet,
    Localnet,
}

impl Environment {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Environment::Mainnet => "https://api.mainnet-beta.solana.com",
            Environment::Devnet => "https://api.devnet.solana.com",
            Environment::Testnet => "https://api.testnet.solana.com",
            Environment::Localnet => "http://127.0.0.1:8899",
        }
    }
}

impl FromStr for Environment {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Environment::Mainnet),
            "devnet" => Ok(Environment::Devnet),
            "testnet" => Ok(Environment::Testnet),
            "localnet" | "localhost" => Ok(Environment::Localnet),
            _ => Err(GeneratorError::invalid_argument(
                "env",
                format!("unknown environment '{}'", s),
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Mainnet => "mainnet",
            Environment::Devnet => "devnet",
            Environment::Testnet => "testnet",
            Environment::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

/// Settings for one run, built once and passed by reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub rpc_url: String,
    pub commitment: String,
    pub log_level: LevelFilter,
    /// Check node health before assembling
    pub probe: bool,
}

impl GeneratorConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            commitment: DEFAULT_COMMITMENT.to_string(),
            log_level: LevelFilter::Info,
            probe: true,
        }
    }

    /// Pick the endpoint from an explicit URL or a named environment.
    /// An explicit URL wins.
    pub fn from_endpoint(env: Option<Environment>, rpc_url: Option<&str>) -> GeneratorResult<Self> {
        let url = match (rpc_url, env) {
            (Some(url), _) => validate_url(url)?,
            (None, Some(env)) => env.rpc_url().to_string(),
            (None, None) => {
                return Err(GeneratorError::invalid_argument(
                    "rpc",
                    "either --env or --rpc-url is required",
                ))
            }
        };
        Ok(Self::new(url))
    }

    pub fn with_commitment(mut self, commitment: &str) -> Self {
        self.commitment = commitment.to_string();
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }
}

fn validate_url(url: &str) -> GeneratorResult<String> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(GeneratorError::invalid_argument(
            "rpc-url",
            format!("'{}' is not an http(s) URL", url),
        ))
    }
}
