//! Access to a network node
//!
//! The assembler only needs three things from the network: a fresh
//! blockhash, a dry-run, and raw account data for lookup tables. They sit
//! behind [`Node`] so assembly can be exercised without a live endpoint.

pub mod rpc;

use async_trait::async_trait;
use log::debug;
use solana_message::AddressLookupTableAccount;
use solana_pubkey::Pubkey;

use crate::constants::programs::ADDRESS_LOOKUP_TABLE_PROGRAM_ID;
use crate::errors::{GeneratorError, GeneratorResult};
use crate::models::{FreshnessAnchor, SimulationOutcome};

pub use self::rpc::{ensure_reachable, probe, RpcNode};

/// Bytes before the first address in a lookup table account
pub const LOOKUP_TABLE_META_SIZE: usize = 56;

/// Discriminant of an initialized lookup table
const LOOKUP_TABLE_STATE: u32 = 1;

/// Raw on-chain account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait Node: Send + Sync {
    /// Where requests go, for error messages
    fn endpoint(&self) -> &str;

    /// Latest blockhash and the last block height it stays valid for
    async fn latest_blockhash(&self) -> GeneratorResult<FreshnessAnchor>;

    /// Execute a serialized transaction without verifying signatures.
    ///
    /// `Err` means the node could not be asked; a transaction the runtime
    /// rejects is an `Ok` outcome with `success == false`.
    async fn simulate(&self, transaction: &[u8]) -> GeneratorResult<SimulationOutcome>;

    /// `None` when the account does not exist
    async fn get_account(&self, address: &Pubkey) -> GeneratorResult<Option<RemoteAccount>>;
}

/// Decode the address list of a lookup table account
pub fn parse_lookup_table(key: Pubkey, data: &[u8]) -> GeneratorResult<AddressLookupTableAccount> {
    let invalid = |reason: String| GeneratorError::InvalidAddress {
        field: "lookup table".to_string(),
        value: key.to_string(),
        reason,
    };

    if data.len() < LOOKUP_TABLE_META_SIZE {
        return Err(invalid(format!("account data is only {} bytes", data.len())));
    }
    let mut discriminant = [0u8; 4];
    discriminant.copy_from_slice(&data[..4]);
    if u32::from_le_bytes(discriminant) != LOOKUP_TABLE_STATE {
        return Err(invalid("account is not an initialized lookup table".to_string()));
    }

    let raw = &data[LOOKUP_TABLE_META_SIZE..];
    if raw.len() % 32 != 0 {
        return Err(invalid(format!("{} trailing bytes after the addresses", raw.len() % 32)));
    }
    let addresses = raw
        .chunks_exact(32)
        .map(|chunk| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(chunk);
            Pubkey::new_from_array(bytes)
        })
        .collect();

    Ok(AddressLookupTableAccount { key, addresses })
}

/// Fetch and decode one lookup table
pub async fn fetch_lookup_table<N: Node + ?Sized>(
    node: &N,
    key: &Pubkey,
) -> GeneratorResult<AddressLookupTableAccount> {
    let account = node.get_account(key).await?.ok_or_else(|| GeneratorError::InvalidAddress {
        field: "lookup table".to_string(),
        value: key.to_string(),
        reason: "account not found".to_string(),
    })?;

    if account.owner != ADDRESS_LOOKUP_TABLE_PROGRAM_ID {
        return Err(GeneratorError::InvalidAddress {
            field: "lookup table".to_string(),
            value: key.to_string(),
            reason: format!("owned by {}, not the lookup table program", account.owner),
        });
    }

    let table = parse_lookup_table(*key, &account.data)?;
    debug!("Lookup table {} holds {} addresses", key, table.addresses.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_data(addresses: &[Pubkey]) -> Vec<u8> {
        let mut data = vec![0u8; LOOKUP_TABLE_META_SIZE];
        data[..4].copy_from_slice(&LOOKUP_TABLE_STATE.to_le_bytes());
        for address in addresses {
            data.extend_from_slice(address.as_ref());
        }
        data
    }

    #[test]
    fn test_parse_lookup_table() {
        let key = Pubkey::new_unique();
        let addresses = vec![Pubkey::new_unique(), Pubkey::new_unique()];
        let table = parse_lookup_table(key, &table_data(&addresses)).unwrap();
        assert_eq!(table.key, key);
        assert_eq!(table.addresses, addresses);

        let empty = parse_lookup_table(key, &table_data(&[])).unwrap();
        assert!(empty.addresses.is_empty());
    }

    #[test]
    fn test_parse_lookup_table_rejects_garbage() {
        let key = Pubkey::new_unique();
        assert!(parse_lookup_table(key, &[1, 0, 0, 0]).is_err());

        let mut uninitialized = table_data(&[]);
        uninitialized[0] = 0;
        assert!(parse_lookup_table(key, &uninitialized).is_err());

        let mut ragged = table_data(&[Pubkey::new_unique()]);
        ragged.push(9);
        assert!(parse_lookup_table(key, &ragged).is_err());
    }
}
