//! CCIP router administration. Instruction names are snake_case.

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use super::{ProgramFamily, ProgramInstruction};
use crate::accounts::AccountMetaBuilder;
use crate::codec::Field;
use crate::constants::programs::SYSTEM_PROGRAM_ID;
use crate::derivation;
use crate::errors::{GeneratorError, GeneratorResult};

pub const INSTRUCTIONS: &[&str] = &[
    "transfer_ownership",
    "accept_ownership",
    "add_chain_selector",
    "update_dest_chain_config",
    "owner_propose_administrator",
    "transfer_admin_role_token_admin_registry",
    "accept_admin_role_token_admin_registry",
    "set_pool",
];

/// Per destination settings held by the router
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DestChainConfig {
    pub lane_code_version: u8,
    pub allowed_senders: Vec<Pubkey>,
    pub allow_list_enabled: bool,
}

impl DestChainConfig {
    fn field(&self) -> Field {
        Field::Struct(vec![
            Field::U8(self.lane_code_version),
            Field::pubkeys(&self.allowed_senders),
            Field::Bool(self.allow_list_enabled),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterInstruction {
    TransferOwnership {
        proposed_owner: Pubkey,
    },
    AcceptOwnership,
    AddChainSelector {
        chain_selector: u64,
        config: DestChainConfig,
    },
    UpdateDestChainConfig {
        chain_selector: u64,
        config: DestChainConfig,
    },
    OwnerProposeAdministrator {
        mint: Pubkey,
        administrator: Pubkey,
    },
    TransferAdminRole {
        mint: Pubkey,
        new_admin: Pubkey,
    },
    AcceptAdminRole {
        mint: Pubkey,
    },
    SetPool {
        mint: Pubkey,
        pool_lookup_table: Pubkey,
        /// Positions in the lookup table the router marks writable
        writable_indexes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterRequest {
    pub authority: Pubkey,
    pub instruction: RouterInstruction,
}

impl RouterRequest {
    fn registry_accounts(&self, program_id: &Pubkey, mint: &Pubkey) -> GeneratorResult<AccountMetaBuilder> {
        let config = derivation::program_config(program_id)?.address;
        let registry = derivation::router_token_admin_registry(program_id, mint)?.address;
        Ok(AccountMetaBuilder::new()
            .add_read_only(config)
            .add_writable(registry)
            .add_read_only(*mint))
    }
}

impl ProgramInstruction for RouterRequest {
    fn family(&self) -> ProgramFamily {
        ProgramFamily::Router
    }

    fn canonical_name(&self) -> &'static str {
        match &self.instruction {
            RouterInstruction::TransferOwnership { .. } => "transfer_ownership",
            RouterInstruction::AcceptOwnership => "accept_ownership",
            RouterInstruction::AddChainSelector { .. } => "add_chain_selector",
            RouterInstruction::UpdateDestChainConfig { .. } => "update_dest_chain_config",
            RouterInstruction::OwnerProposeAdministrator { .. } => "owner_propose_administrator",
            RouterInstruction::TransferAdminRole { .. } => "transfer_admin_role_token_admin_registry",
            RouterInstruction::AcceptAdminRole { .. } => "accept_admin_role_token_admin_registry",
            RouterInstruction::SetPool { .. } => "set_pool",
        }
    }

    fn validate(&self) -> GeneratorResult<()> {
        match &self.instruction {
            RouterInstruction::AddChainSelector { chain_selector, .. }
            | RouterInstruction::UpdateDestChainConfig { chain_selector, .. }
                if *chain_selector == 0 =>
            {
                Err(GeneratorError::invalid_argument(
                    "chain_selector",
                    "must be non-zero",
                ))
            }
            _ => Ok(()),
        }
    }

    fn derive_accounts(&self, program_id: &Pubkey) -> GeneratorResult<Vec<AccountMeta>> {
        let accounts = match &self.instruction {
            RouterInstruction::TransferOwnership { .. } | RouterInstruction::AcceptOwnership => {
                AccountMetaBuilder::new()
                    .add_writable(derivation::program_config(program_id)?.address)
                    .add_signer(self.authority)
                    .build()
            }
            RouterInstruction::AddChainSelector { chain_selector, .. }
            | RouterInstruction::UpdateDestChainConfig { chain_selector, .. } => {
                let dest = derivation::router_dest_chain_state(program_id, *chain_selector)?.address;
                AccountMetaBuilder::new()
                    .add_writable(dest)
                    .add_read_only(derivation::program_config(program_id)?.address)
                    .add_writable_signer(self.authority)
                    .add_read_only(SYSTEM_PROGRAM_ID)
                    .build()
            }
            RouterInstruction::OwnerProposeAdministrator { mint, .. } => self
                .registry_accounts(program_id, mint)?
                .add_writable_signer(self.authority)
                .add_read_only(SYSTEM_PROGRAM_ID)
                .build(),
            RouterInstruction::TransferAdminRole { mint, .. }
            | RouterInstruction::AcceptAdminRole { mint } => self
                .registry_accounts(program_id, mint)?
                .add_signer(self.authority)
                .build(),
            RouterInstruction::SetPool {
                mint,
                pool_lookup_table,
                ..
            } => self
                .registry_accounts(program_id, mint)?
                .add_read_only(*pool_lookup_table)
                .add_writable_signer(self.authority)
                .build(),
        };
        Ok(accounts)
    }

    fn fields(&self) -> Vec<Field> {
        match &self.instruction {
            RouterInstruction::TransferOwnership { proposed_owner } => {
                vec![Field::Pubkey(*proposed_owner)]
            }
            RouterInstruction::AcceptOwnership | RouterInstruction::AcceptAdminRole { .. } => vec![],
            RouterInstruction::AddChainSelector {
                chain_selector,
                config,
            }
            | RouterInstruction::UpdateDestChainConfig {
                chain_selector,
                config,
            } => vec![Field::U64(*chain_selector), config.field()],
            RouterInstruction::OwnerProposeAdministrator { administrator, .. } => {
                vec![Field::Pubkey(*administrator)]
            }
            RouterInstruction::TransferAdminRole { new_admin, .. } => vec![Field::Pubkey(*new_admin)],
            RouterInstruction::SetPool {
                writable_indexes, ..
            } => vec![Field::Bytes(writable_indexes.clone())],
        }
    }
}
