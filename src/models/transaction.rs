//! Assembled transaction and dry-run results

use serde::Serialize;
use solana_hash::Hash;
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use crate::constants::anchor;
use crate::utils::serialize_display;

/// Recent blockhash a transaction cites, and the height after which the
/// network stops accepting it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreshnessAnchor {
    #[serde(serialize_with = "serialize_display")]
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// One participating account, flattened for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    #[serde(serialize_with = "serialize_display")]
    pub address: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl From<&AccountMeta> for AccountSummary {
    fn from(meta: &AccountMeta) -> Self {
        Self {
            address: meta.pubkey,
            is_signer: meta.is_signer,
            is_writable: meta.is_writable,
        }
    }
}

/// Outcome of executing the unsigned transaction against node state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    pub success: bool,
    /// Error reported by the runtime, as returned by the node
    pub error: Option<String>,
    /// Program error code, when the failure was a custom program error
    pub custom_error_code: Option<u32>,
    pub logs: Option<Vec<String>>,
    pub units_consumed: Option<u64>,
}

impl SimulationOutcome {
    /// Framework name of the custom error code, if Anchor defines it
    pub fn error_name(&self) -> Option<&'static str> {
        self.custom_error_code.and_then(anchor::error_name)
    }

    /// Whether the failure was raised by the program itself rather than the
    /// framework (Anchor reserves codes below 6000)
    pub fn is_program_error(&self) -> bool {
        self.custom_error_code
            .map(|code| code >= anchor::CUSTOM_ERROR_OFFSET)
            .unwrap_or(false)
    }
}

/// An unsigned, compiled transaction with everything needed to review it
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedTransaction {
    /// `<family>::<instruction>` of the first instruction
    pub label: String,
    #[serde(serialize_with = "serialize_display")]
    pub program_id: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub fee_payer: Pubkey,
    pub anchor: FreshnessAnchor,
    /// Serialized versioned transaction with empty signature slots
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Accounts of the first instruction only
    pub accounts: Vec<AccountSummary>,
    pub simulation: SimulationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_name() {
        let outcome = SimulationOutcome {
            success: false,
            error: Some("{\"InstructionError\":[0,{\"Custom\":2002}]}".to_string()),
            custom_error_code: Some(2002),
            ..Default::default()
        };
        assert_eq!(outcome.error_name(), Some("ConstraintSigner"));
        assert!(!outcome.is_program_error());

        let program = SimulationOutcome {
            custom_error_code: Some(6003),
            ..Default::default()
        };
        assert_eq!(program.error_name(), None);
        assert!(program.is_program_error());
    }

    #[test]
    fn test_account_summary_from_meta() {
        let key = Pubkey::new_from_array([5; 32]);
        let summary = AccountSummary::from(&AccountMeta::new(key, true));
        assert_eq!(summary.address, key);
        assert!(summary.is_signer);
        assert!(summary.is_writable);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["address"], key.to_string());
    }
}
