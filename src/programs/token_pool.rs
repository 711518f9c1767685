//! CCIP token pool administration (burn-mint and lock-release pools)
//!
//! Both pool programs share the base instruction set; lock-release adds
//! liquidity management. Instruction names are lowerCamelCase.

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use super::{ProgramFamily, ProgramInstruction};
use crate::accounts::AccountMetaBuilder;
use crate::codec::{Field, RemoteAddress, REMOTE_ADDRESS_WIDTH};
use crate::constants::programs::SYSTEM_PROGRAM_ID;
use crate::derivation;
use crate::errors::{GeneratorError, GeneratorResult};

pub const BASE_INSTRUCTIONS: &[&str] = &[
    "initialize",
    "transferOwnership",
    "acceptOwnership",
    "setRouter",
    "initChainRemoteConfig",
    "editChainRemoteConfig",
    "appendRemotePoolAddresses",
    "setChainRateLimit",
    "deleteChainConfig",
    "configureAllowList",
    "removeFromAllowList",
];

pub const LOCKRELEASE_INSTRUCTIONS: &[&str] = &[
    "setRebalancer",
    "setCanAcceptLiquidity",
    "provideLiquidity",
    "withdrawLiquidity",
];

/// Token bucket settings for one direction of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub capacity: u64,
    pub rate: u64,
}

impl RateLimitConfig {
    /// Enabled buckets need `0 < rate < capacity`; disabled ones must be zeroed
    pub fn validate(&self, direction: &str) -> GeneratorResult<()> {
        if self.enabled {
            if self.rate == 0 || self.rate >= self.capacity {
                return Err(GeneratorError::invalid_argument(
                    direction,
                    format!(
                        "enabled rate limit needs 0 < rate < capacity (rate {}, capacity {})",
                        self.rate, self.capacity
                    ),
                ));
            }
        } else if self.rate != 0 || self.capacity != 0 {
            return Err(GeneratorError::invalid_argument(
                direction,
                "disabled rate limit must have zero rate and capacity",
            ));
        }
        Ok(())
    }

    fn field(&self) -> Field {
        Field::Struct(vec![
            Field::Bool(self.enabled),
            Field::U64(self.capacity),
            Field::U64(self.rate),
        ])
    }
}

/// Counterpart pool and token on a remote chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub pool_addresses: Vec<Vec<u8>>,
    /// Remote token address, stored fixed-width on-chain
    pub token_address: Vec<u8>,
    pub decimals: u8,
}

impl RemoteConfig {
    fn field(&self) -> Field {
        Field::Struct(vec![
            remote_address_list(&self.pool_addresses),
            Field::RemoteAddress(RemoteAddress::fixed(self.token_address.clone())),
            Field::U8(self.decimals),
        ])
    }
}

fn remote_address_list(addresses: &[Vec<u8>]) -> Field {
    Field::List(
        addresses
            .iter()
            .map(|a| Field::RemoteAddress(RemoteAddress::variable(a.clone())))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPoolInstruction {
    Initialize,
    TransferOwnership {
        proposed_owner: Pubkey,
    },
    AcceptOwnership,
    SetRouter {
        new_router: Pubkey,
    },
    InitChainRemoteConfig {
        remote_chain_selector: u64,
        config: RemoteConfig,
    },
    EditChainRemoteConfig {
        remote_chain_selector: u64,
        config: RemoteConfig,
    },
    AppendRemotePoolAddresses {
        remote_chain_selector: u64,
        addresses: Vec<Vec<u8>>,
    },
    SetChainRateLimit {
        remote_chain_selector: u64,
        inbound: RateLimitConfig,
        outbound: RateLimitConfig,
    },
    DeleteChainConfig {
        remote_chain_selector: u64,
    },
    ConfigureAllowList {
        add: Vec<Pubkey>,
        enabled: bool,
    },
    RemoveFromAllowList {
        remove: Vec<Pubkey>,
    },
    SetRebalancer {
        rebalancer: Pubkey,
    },
    SetCanAcceptLiquidity {
        allow: bool,
    },
    ProvideLiquidity {
        amount: u64,
        token_program: Pubkey,
        /// Defaults to the authority's associated token account
        token_account: Option<Pubkey>,
    },
    WithdrawLiquidity {
        amount: u64,
        token_program: Pubkey,
        token_account: Option<Pubkey>,
    },
}

/// A token pool instruction for one mint, signed by `authority`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPoolRequest {
    pub family: ProgramFamily,
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub instruction: TokenPoolInstruction,
}

impl TokenPoolRequest {
    fn chain_config(&self, program_id: &Pubkey, selector: u64) -> GeneratorResult<Pubkey> {
        Ok(derivation::token_pool_chain_config(program_id, selector, &self.mint)?.address)
    }

    fn liquidity_accounts(
        &self,
        program_id: &Pubkey,
        token_program: &Pubkey,
        token_account: &Option<Pubkey>,
    ) -> GeneratorResult<Vec<AccountMeta>> {
        let state = derivation::token_pool_state(program_id, &self.mint)?.address;
        let pool_signer = derivation::token_pool_signer(program_id, &self.mint)?.address;
        let pool_token_account =
            derivation::associated_token_account(&pool_signer, &self.mint, token_program)?.address;
        let remote_token_account = match token_account {
            Some(account) => *account,
            None => {
                derivation::associated_token_account(&self.authority, &self.mint, token_program)?.address
            }
        };

        Ok(AccountMetaBuilder::new()
            .add_read_only(state)
            .add_read_only(*token_program)
            .add_writable(self.mint)
            .add_read_only(pool_signer)
            .add_writable(pool_token_account)
            .add_writable(remote_token_account)
            .add_signer(self.authority)
            .build())
    }
}

impl ProgramInstruction for TokenPoolRequest {
    fn family(&self) -> ProgramFamily {
        self.family
    }

    fn canonical_name(&self) -> &'static str {
        match &self.instruction {
            TokenPoolInstruction::Initialize => "initialize",
            TokenPoolInstruction::TransferOwnership { .. } => "transferOwnership",
            TokenPoolInstruction::AcceptOwnership => "acceptOwnership",
            TokenPoolInstruction::SetRouter { .. } => "setRouter",
            TokenPoolInstruction::InitChainRemoteConfig { .. } => "initChainRemoteConfig",
            TokenPoolInstruction::EditChainRemoteConfig { .. } => "editChainRemoteConfig",
            TokenPoolInstruction::AppendRemotePoolAddresses { .. } => "appendRemotePoolAddresses",
            TokenPoolInstruction::SetChainRateLimit { .. } => "setChainRateLimit",
            TokenPoolInstruction::DeleteChainConfig { .. } => "deleteChainConfig",
            TokenPoolInstruction::ConfigureAllowList { .. } => "configureAllowList",
            TokenPoolInstruction::RemoveFromAllowList { .. } => "removeFromAllowList",
            TokenPoolInstruction::SetRebalancer { .. } => "setRebalancer",
            TokenPoolInstruction::SetCanAcceptLiquidity { .. } => "setCanAcceptLiquidity",
            TokenPoolInstruction::ProvideLiquidity { .. } => "provideLiquidity",
            TokenPoolInstruction::WithdrawLiquidity { .. } => "withdrawLiquidity",
        }
    }

    fn validate(&self) -> GeneratorResult<()> {
        if !matches!(
            self.family,
            ProgramFamily::BurnMintTokenPool | ProgramFamily::LockReleaseTokenPool
        ) {
            return Err(GeneratorError::invalid_argument(
                "family",
                format!("{} is not a token pool family", self.family),
            ));
        }
        match &self.instruction {
            TokenPoolInstruction::InitChainRemoteConfig { config, .. } => {
                if !config.pool_addresses.is_empty() {
                    return Err(GeneratorError::invalid_argument(
                        "pool_addresses",
                        "must be empty on init, add them with appendRemotePoolAddresses",
                    ));
                }
                check_remote_token(&config.token_address)
            }
            TokenPoolInstruction::EditChainRemoteConfig { config, .. } => {
                check_remote_token(&config.token_address)
            }
            TokenPoolInstruction::AppendRemotePoolAddresses { addresses, .. } => {
                if addresses.is_empty() {
                    return Err(GeneratorError::invalid_argument(
                        "addresses",
                        "at least one remote pool address is required",
                    ));
                }
                Ok(())
            }
            TokenPoolInstruction::SetChainRateLimit { inbound, outbound, .. } => {
                inbound.validate("inbound")?;
                outbound.validate("outbound")
            }
            TokenPoolInstruction::ProvideLiquidity { amount, .. }
            | TokenPoolInstruction::WithdrawLiquidity { amount, .. } => {
                if *amount == 0 {
                    return Err(GeneratorError::invalid_argument("amount", "must be greater than zero"));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn derive_accounts(&self, program_id: &Pubkey) -> GeneratorResult<Vec<AccountMeta>> {
        let state = derivation::token_pool_state(program_id, &self.mint)?.address;

        let accounts = match &self.instruction {
            TokenPoolInstruction::Initialize => {
                let program_data = derivation::program_data(program_id)?.address;
                let config = derivation::program_config(program_id)?.address;
                AccountMetaBuilder::new()
                    .add_writable(state)
                    .add_read_only(self.mint)
                    .add_writable_signer(self.authority)
                    .add_read_only(SYSTEM_PROGRAM_ID)
                    .add_read_only(*program_id)
                    .add_read_only(program_data)
                    .add_read_only(config)
                    .build()
            }
            TokenPoolInstruction::TransferOwnership { .. }
            | TokenPoolInstruction::AcceptOwnership
            | TokenPoolInstruction::SetRouter { .. }
            | TokenPoolInstruction::SetRebalancer { .. }
            | TokenPoolInstruction::SetCanAcceptLiquidity { .. } => AccountMetaBuilder::new()
                .add_writable(state)
                .add_read_only(self.mint)
                .add_signer(self.authority)
                .build(),
            TokenPoolInstruction::InitChainRemoteConfig { remote_chain_selector, .. }
            | TokenPoolInstruction::EditChainRemoteConfig { remote_chain_selector, .. }
            | TokenPoolInstruction::AppendRemotePoolAddresses { remote_chain_selector, .. } => {
                AccountMetaBuilder::new()
                    .add_read_only(state)
                    .add_writable(self.chain_config(program_id, *remote_chain_selector)?)
                    .add_writable_signer(self.authority)
                    .add_read_only(SYSTEM_PROGRAM_ID)
                    .build()
            }
            TokenPoolInstruction::SetChainRateLimit { remote_chain_selector, .. }
            | TokenPoolInstruction::DeleteChainConfig { remote_chain_selector } => {
                AccountMetaBuilder::new()
                    .add_read_only(state)
                    .add_writable(self.chain_config(program_id, *remote_chain_selector)?)
                    .add_writable_signer(self.authority)
                    .build()
            }
            TokenPoolInstruction::ConfigureAllowList { .. }
            | TokenPoolInstruction::RemoveFromAllowList { .. } => AccountMetaBuilder::new()
                .add_writable(state)
                .add_read_only(self.mint)
                .add_writable_signer(self.authority)
                .add_read_only(SYSTEM_PROGRAM_ID)
                .build(),
            TokenPoolInstruction::ProvideLiquidity { token_program, token_account, .. }
            | TokenPoolInstruction::WithdrawLiquidity { token_program, token_account, .. } => {
                self.liquidity_accounts(program_id, token_program, token_account)?
            }
        };
        Ok(accounts)
    }

    fn fields(&self) -> Vec<Field> {
        let mint = Field::Pubkey(self.mint);
        match &self.instruction {
            TokenPoolInstruction::Initialize | TokenPoolInstruction::AcceptOwnership => vec![],
            TokenPoolInstruction::TransferOwnership { proposed_owner } => {
                vec![Field::Pubkey(*proposed_owner)]
            }
            TokenPoolInstruction::SetRouter { new_router } => vec![Field::Pubkey(*new_router)],
            TokenPoolInstruction::InitChainRemoteConfig { remote_chain_selector, config }
            | TokenPoolInstruction::EditChainRemoteConfig { remote_chain_selector, config } => {
                vec![Field::U64(*remote_chain_selector), mint, config.field()]
            }
            TokenPoolInstruction::AppendRemotePoolAddresses { remote_chain_selector, addresses } => {
                vec![
                    Field::U64(*remote_chain_selector),
                    mint,
                    remote_address_list(addresses),
                ]
            }
            TokenPoolInstruction::SetChainRateLimit { remote_chain_selector, inbound, outbound } => {
                vec![
                    Field::U64(*remote_chain_selector),
                    mint,
                    inbound.field(),
                    outbound.field(),
                ]
            }
            TokenPoolInstruction::DeleteChainConfig { remote_chain_selector } => {
                vec![Field::U64(*remote_chain_selector), mint]
            }
            TokenPoolInstruction::ConfigureAllowList { add, enabled } => {
                vec![Field::pubkeys(add), Field::Bool(*enabled)]
            }
            TokenPoolInstruction::RemoveFromAllowList { remove } => vec![Field::pubkeys(remove)],
            TokenPoolInstruction::SetRebalancer { rebalancer } => vec![Field::Pubkey(*rebalancer)],
            TokenPoolInstruction::SetCanAcceptLiquidity { allow } => vec![Field::Bool(*allow)],
            TokenPoolInstruction::ProvideLiquidity { amount, .. }
            | TokenPoolInstruction::WithdrawLiquidity { amount, .. } => vec![Field::U64(*amount)],
        }
    }
}

fn check_remote_token(token_address: &[u8]) -> GeneratorResult<()> {
    if token_address.is_empty() {
        return Err(GeneratorError::invalid_argument(
            "token_address",
            "remote token address is required",
        ));
    }
    if token_address.len() > REMOTE_ADDRESS_WIDTH {
        return Err(GeneratorError::invalid_argument(
            "token_address",
            format!(
                "remote token address is {} bytes, at most {} fit the fixed-width slot",
                token_address.len(),
                REMOTE_ADDRESS_WIDTH
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::programs::TOKEN_PROGRAM_ID;
    use crate::programs::build_instruction;
    use solana_pubkey::pubkey;

    const POOL: Pubkey = pubkey!("41FGToCmdaWa1dgZLKFAjvmx6e6AjVTX7SVRibvsMGVB");
    const MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");
    const AUTHORITY: Pubkey = pubkey!("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");

    fn request(family: ProgramFamily, instruction: TokenPoolInstruction) -> TokenPoolRequest {
        TokenPoolRequest {
            family,
            mint: MINT,
            authority: AUTHORITY,
            instruction,
        }
    }

    #[test]
    fn test_accept_ownership() {
        let req = request(ProgramFamily::BurnMintTokenPool, TokenPoolInstruction::AcceptOwnership);
        let ix = build_instruction(&req, &POOL, &req.family.interface()).unwrap();

        assert_eq!(ix.data, vec![30, 43, 213, 84, 172, 203, 104, 84]);
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(
            ix.accounts[0].pubkey,
            pubkey!("BuZoKabQaVK2viXFosxPEGaz3wfzQ3RB6zQHR9YY4VHT")
        );
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, MINT);
        assert!(!ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, AUTHORITY);
        assert!(ix.accounts[2].is_signer);
    }

    #[test]
    fn test_set_chain_rate_limit_golden_bytes() {
        let req = request(
            ProgramFamily::LockReleaseTokenPool,
            TokenPoolInstruction::SetChainRateLimit {
                remote_chain_selector: 16015286601757825753,
                inbound: RateLimitConfig {
                    enabled: true,
                    capacity: 1_000_000,
                    rate: 100,
                },
                outbound: RateLimitConfig::default(),
            },
        );
        let data = req.encode();

        // sha256("global:setChainRateLimit")[..8], then the Borsh arguments in
        // declaration order: selector, mint, inbound, outbound
        let expected = hex::decode(concat!(
            "e1c7f2744ed3d6bc",
            "d91ad9c94fba41de",
            "069b8857feab8184fb687f634618c035dac439dc1aeb3b5598a0f00000000001",
            "0140420f00000000006400000000000000",
            "0000000000000000000000000000000000",
        ))
        .unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_edit_chain_remote_config_layout() {
        let evm_pool = vec![0x11u8; 20];
        let evm_token = vec![0x22u8; 20];
        let req = request(
            ProgramFamily::BurnMintTokenPool,
            TokenPoolInstruction::EditChainRemoteConfig {
                remote_chain_selector: 1,
                config: RemoteConfig {
                    pool_addresses: vec![evm_pool.clone()],
                    token_address: evm_token.clone(),
                    decimals: 18,
                },
            },
        );
        let data = req.encode();

        let mut offset = 8;
        assert_eq!(&data[offset..offset + 8], &1u64.to_le_bytes());
        offset += 8;
        assert_eq!(&data[offset..offset + 32], MINT.as_ref());
        offset += 32;
        // one pool address, unpadded
        assert_eq!(&data[offset..offset + 4], &1u32.to_le_bytes());
        offset += 4;
        assert_eq!(&data[offset..offset + 4], &20u32.to_le_bytes());
        offset += 4;
        assert_eq!(&data[offset..offset + 20], evm_pool.as_slice());
        offset += 20;
        // token address, original length then padded to 32
        assert_eq!(&data[offset..offset + 4], &20u32.to_le_bytes());
        offset += 4;
        assert_eq!(&data[offset..offset + 12], &[0u8; 12]);
        offset += 12;
        assert_eq!(&data[offset..offset + 20], evm_token.as_slice());
        offset += 20;
        assert_eq!(data[offset], 18);
        assert_eq!(data.len(), offset + 1);
    }

    #[test]
    fn test_init_rejects_pool_addresses() {
        let req = request(
            ProgramFamily::BurnMintTokenPool,
            TokenPoolInstruction::InitChainRemoteConfig {
                remote_chain_selector: 1,
                config: RemoteConfig {
                    pool_addresses: vec![vec![1; 20]],
                    token_address: vec![2; 20],
                    decimals: 9,
                },
            },
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_remote_token_width() {
        let edit = |token_address: Vec<u8>| {
            request(
                ProgramFamily::BurnMintTokenPool,
                TokenPoolInstruction::EditChainRemoteConfig {
                    remote_chain_selector: 1,
                    config: RemoteConfig {
                        pool_addresses: vec![],
                        token_address,
                        decimals: 9,
                    },
                },
            )
        };

        let full = edit(vec![7; 32]);
        assert!(full.validate().is_ok());
        // exactly one slot wide, no padding
        let data = full.encode();
        assert_eq!(&data[data.len() - 37..data.len() - 33], &32u32.to_le_bytes());
        assert_eq!(&data[data.len() - 33..data.len() - 1], &[7u8; 32]);

        let err = edit(vec![7; 33]).validate().unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidArgument { .. }));
        assert!(edit(vec![]).validate().is_err());
    }

    #[test]
    fn test_rate_limit_validation() {
        let ok = RateLimitConfig {
            enabled: true,
            capacity: 10,
            rate: 1,
        };
        assert!(ok.validate("inbound").is_ok());
        assert!(RateLimitConfig::default().validate("inbound").is_ok());

        let rate_too_high = RateLimitConfig {
            enabled: true,
            capacity: 10,
            rate: 10,
        };
        assert!(rate_too_high.validate("inbound").is_err());

        let disabled_nonzero = RateLimitConfig {
            enabled: false,
            capacity: 10,
            rate: 0,
        };
        assert!(disabled_nonzero.validate("outbound").is_err());
    }

    #[test]
    fn test_liquidity_is_lockrelease_only() {
        let instruction = TokenPoolInstruction::ProvideLiquidity {
            amount: 5,
            token_program: TOKEN_PROGRAM_ID,
            token_account: None,
        };
        let burnmint = request(ProgramFamily::BurnMintTokenPool, instruction.clone());
        let err = build_instruction(&burnmint, &POOL, &burnmint.family.interface()).unwrap_err();
        assert!(matches!(
            err.root(),
            GeneratorError::UnknownInstruction { .. }
        ));

        let lockrelease = request(ProgramFamily::LockReleaseTokenPool, instruction);
        let ix = build_instruction(&lockrelease, &POOL, &lockrelease.family.interface()).unwrap();
        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(ix.accounts[1].pubkey, TOKEN_PROGRAM_ID);
        assert!(ix.accounts[6].is_signer);
        assert_eq!(&ix.data[8..], &5u64.to_le_bytes());
    }

    #[test]
    fn test_initialize_accounts() {
        let req = request(ProgramFamily::BurnMintTokenPool, TokenPoolInstruction::Initialize);
        let accounts = req.derive_accounts(&POOL).unwrap();
        assert_eq!(accounts.len(), 7);
        assert_eq!(accounts[3].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(accounts[4].pubkey, POOL);
        assert_eq!(accounts[5].pubkey, derivation::program_data(&POOL).unwrap().address);
        assert!(accounts[2].is_signer && accounts[2].is_writable);
    }

    #[test]
    fn test_configure_allow_list_empty() {
        let req = request(
            ProgramFamily::BurnMintTokenPool,
            TokenPoolInstruction::ConfigureAllowList {
                add: vec![],
                enabled: true,
            },
        );
        let data = req.encode();
        assert_eq!(&data[8..], &[0, 0, 0, 0, 1]);
    }
}
