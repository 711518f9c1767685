//! Program-derived address computation
//!
//! Every address here is a pure function of a program identity and an
//! ordered list of seeds. The search itself (bump from 255 downward until
//! the hash lands off the ed25519 curve) is delegated to `solana-pubkey`
//! so the result matches what the runtime computes on-chain.

use log::debug;
use serde::Serialize;
use solana_pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

use crate::constants::programs::{ASSOCIATED_TOKEN_PROGRAM_ID, BPF_LOADER_UPGRADEABLE_ID};
use crate::constants::seeds;
use crate::errors::{GeneratorError, GeneratorResult};
use crate::utils::serialize_display;

/// An address derived from seeds, with the bump that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedAddress {
    #[serde(serialize_with = "serialize_display")]
    pub address: Pubkey,
    pub bump: u8,
}

/// Check seeds against the runtime limits.
///
/// One of the `MAX_SEEDS` slots is taken by the bump, so callers get one
/// fewer.
pub fn validate_seeds(seeds: &[&[u8]]) -> GeneratorResult<()> {
    let max = MAX_SEEDS - 1;
    if seeds.len() > max {
        return Err(GeneratorError::TooManySeeds {
            count: seeds.len(),
            max,
        });
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(GeneratorError::SeedTooLong {
                index,
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
    }
    Ok(())
}

/// Derive the canonical program address for `seeds` under `program_id`
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> GeneratorResult<DerivedAddress> {
    validate_seeds(seeds)?;
    let (address, bump) = Pubkey::try_find_program_address(seeds, program_id).ok_or_else(|| {
        GeneratorError::NoViableBump {
            program_id: program_id.to_string(),
        }
    })?;
    debug!("Derived {} (bump {}) from {} seeds under {}", address, bump, seeds.len(), program_id);
    Ok(DerivedAddress { address, bump })
}

/// Encode a chain selector the way programs expect it in seeds
pub fn chain_selector_seed(selector: u64) -> [u8; 8] {
    selector.to_le_bytes()
}

/// Token pool state account for `mint`
pub fn token_pool_state(pool_program: &Pubkey, mint: &Pubkey) -> GeneratorResult<DerivedAddress> {
    derive(pool_program, &[seeds::TOKEN_POOL_STATE, mint.as_ref()])
}

/// Token pool configuration for one remote chain
pub fn token_pool_chain_config(
    pool_program: &Pubkey,
    remote_chain_selector: u64,
    mint: &Pubkey,
) -> GeneratorResult<DerivedAddress> {
    derive(
        pool_program,
        &[
            seeds::TOKEN_POOL_CHAIN_CONFIG,
            &chain_selector_seed(remote_chain_selector),
            mint.as_ref(),
        ],
    )
}

/// Signer PDA that owns the pool's token accounts
pub fn token_pool_signer(pool_program: &Pubkey, mint: &Pubkey) -> GeneratorResult<DerivedAddress> {
    derive(pool_program, &[seeds::TOKEN_POOL_SIGNER, mint.as_ref()])
}

/// Program-wide config account (router and pool programs share the seed)
pub fn program_config(program: &Pubkey) -> GeneratorResult<DerivedAddress> {
    derive(program, &[seeds::CONFIG])
}

/// Router state for one destination chain
pub fn router_dest_chain_state(router: &Pubkey, dest_chain_selector: u64) -> GeneratorResult<DerivedAddress> {
    derive(
        router,
        &[seeds::DEST_CHAIN_STATE, &chain_selector_seed(dest_chain_selector)],
    )
}

/// Router token admin registry entry for `mint`
pub fn router_token_admin_registry(router: &Pubkey, mint: &Pubkey) -> GeneratorResult<DerivedAddress> {
    derive(router, &[seeds::TOKEN_ADMIN_REGISTRY, mint.as_ref()])
}

/// Associated token account of `owner` for `mint`
pub fn associated_token_account(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> GeneratorResult<DerivedAddress> {
    derive(
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
    )
}

/// Metaplex metadata account for `mint`
pub fn metadata_account(metadata_program: &Pubkey, mint: &Pubkey) -> GeneratorResult<DerivedAddress> {
    derive(
        metadata_program,
        &[seeds::METADATA, metadata_program.as_ref(), mint.as_ref()],
    )
}

/// Program data account of an upgradeable program
pub fn program_data(program: &Pubkey) -> GeneratorResult<DerivedAddress> {
    derive(&BPF_LOADER_UPGRADEABLE_ID, &[program.as_ref()])
}
