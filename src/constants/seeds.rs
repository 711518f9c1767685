//! Seed prefixes for program-derived addresses

/// Token pool state, seeded with the mint
pub const TOKEN_POOL_STATE: &[u8] = b"ccip_tokenpool_config";

/// Per remote chain configuration, seeded with the chain selector and mint
pub const TOKEN_POOL_CHAIN_CONFIG: &[u8] = b"ccip_tokenpool_chainconfig";

/// Pool signer that owns pool token accounts
pub const TOKEN_POOL_SIGNER: &[u8] = b"ccip_tokenpool_signer";

/// Program-wide config, shared by the router and the pool programs
pub const CONFIG: &[u8] = b"config";

/// Router per destination chain state
pub const DEST_CHAIN_STATE: &[u8] = b"dest_chain_state";

/// Router token admin registry, seeded with the mint
pub const TOKEN_ADMIN_REGISTRY: &[u8] = b"token_admin_registry";

/// Metaplex metadata account prefix
pub const METADATA: &[u8] = b"metadata";
