//! SPL Token instructions
//!
//! Native program: a one byte instruction tag instead of a sighash, and no
//! Anchor account validation, so wrong accounts surface as raw program
//! errors in the dry-run.

use std::str::FromStr;

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use super::{ProgramFamily, ProgramInstruction};
use crate::accounts::AccountMetaBuilder;
use crate::codec::{Discriminator, Field};
use crate::derivation;
use crate::errors::{GeneratorError, GeneratorResult};

pub const INSTRUCTIONS: &[&str] = &["mintTo", "transferChecked", "setAuthority"];

pub(crate) const SET_AUTHORITY_TAG: u8 = 6;
pub(crate) const MINT_TO_TAG: u8 = 7;
pub(crate) const TRANSFER_CHECKED_TAG: u8 = 12;

/// Which authority `setAuthority` replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthorityType {
    MintTokens = 0,
    FreezeAccount = 1,
    AccountOwner = 2,
    CloseAccount = 3,
}

impl FromStr for AuthorityType {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "minttokens" | "mint" => Ok(AuthorityType::MintTokens),
            "freezeaccount" | "freeze" => Ok(AuthorityType::FreezeAccount),
            "accountowner" | "owner" => Ok(AuthorityType::AccountOwner),
            "closeaccount" | "close" => Ok(AuthorityType::CloseAccount),
            _ => Err(GeneratorError::invalid_argument(
                "authority_type",
                format!(
                    "unknown authority type '{}', expected mint-tokens, freeze-account, account-owner or close-account",
                    s
                ),
            )),
        }
    }
}

/// A token account given directly or as the associated account of an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAccount {
    Address(Pubkey),
    OwnerAta(Pubkey),
}

impl TokenAccount {
    pub fn resolve(&self, mint: &Pubkey, token_program: &Pubkey) -> GeneratorResult<Pubkey> {
        match self {
            TokenAccount::Address(address) => Ok(*address),
            TokenAccount::OwnerAta(owner) => {
                Ok(derivation::associated_token_account(owner, mint, token_program)?.address)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplTokenInstruction {
    MintTo {
        destination: TokenAccount,
        amount: u64,
    },
    TransferChecked {
        /// Defaults to the authority's associated account
        source: Option<TokenAccount>,
        destination: TokenAccount,
        amount: u64,
        decimals: u8,
    },
    SetAuthority {
        /// Mint or token account whose authority changes, defaults to the mint
        account: Option<Pubkey>,
        authority_type: AuthorityType,
        new_authority: Option<Pubkey>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplTokenRequest {
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub instruction: SplTokenInstruction,
}

impl ProgramInstruction for SplTokenRequest {
    fn family(&self) -> ProgramFamily {
        ProgramFamily::SplToken
    }

    fn canonical_name(&self) -> &'static str {
        match &self.instruction {
            SplTokenInstruction::MintTo { .. } => "mintTo",
            SplTokenInstruction::TransferChecked { .. } => "transferChecked",
            SplTokenInstruction::SetAuthority { .. } => "setAuthority",
        }
    }

    fn discriminator(&self) -> Discriminator {
        Discriminator::Tag(match &self.instruction {
            SplTokenInstruction::MintTo { .. } => MINT_TO_TAG,
            SplTokenInstruction::TransferChecked { .. } => TRANSFER_CHECKED_TAG,
            SplTokenInstruction::SetAuthority { .. } => SET_AUTHORITY_TAG,
        })
    }

    fn validate(&self) -> GeneratorResult<()> {
        match &self.instruction {
            SplTokenInstruction::MintTo { amount, .. }
            | SplTokenInstruction::TransferChecked { amount, .. }
                if *amount == 0 =>
            {
                Err(GeneratorError::invalid_argument("amount", "must be greater than zero"))
            }
            _ => Ok(()),
        }
    }

    fn derive_accounts(&self, program_id: &Pubkey) -> GeneratorResult<Vec<AccountMeta>> {
        let accounts = match &self.instruction {
            SplTokenInstruction::MintTo { destination, .. } => AccountMetaBuilder::new()
                .add_writable(self.mint)
                .add_writable(destination.resolve(&self.mint, program_id)?)
                .add_signer(self.authority)
                .build(),
            SplTokenInstruction::TransferChecked {
                source,
                destination,
                ..
            } => {
                let source = source
                    .unwrap_or(TokenAccount::OwnerAta(self.authority))
                    .resolve(&self.mint, program_id)?;
                AccountMetaBuilder::new()
                    .add_writable(source)
                    .add_read_only(self.mint)
                    .add_writable(destination.resolve(&self.mint, program_id)?)
                    .add_signer(self.authority)
                    .build()
            }
            SplTokenInstruction::SetAuthority { account, .. } => AccountMetaBuilder::new()
                .add_writable(account.unwrap_or(self.mint))
                .add_signer(self.authority)
                .build(),
        };
        Ok(accounts)
    }

    fn fields(&self) -> Vec<Field> {
        match &self.instruction {
            SplTokenInstruction::MintTo { amount, .. } => vec![Field::U64(*amount)],
            SplTokenInstruction::TransferChecked {
                amount, decimals, ..
            } => vec![Field::U64(*amount), Field::U8(*decimals)],
            SplTokenInstruction::SetAuthority {
                authority_type,
                new_authority,
                ..
            } => vec![
                Field::U8(*authority_type as u8),
                Field::optional(new_authority.map(Field::Pubkey)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::programs::TOKEN_PROGRAM_ID;
    use crate::programs::build_instruction;
    use solana_pubkey::pubkey;

    const USDC: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xYbBLRu9E5f9c8R3GEzS9Jz");
    const OWNER: Pubkey = pubkey!("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");

    fn request(instruction: SplTokenInstruction) -> SplTokenRequest {
        SplTokenRequest {
            mint: USDC,
            authority: OWNER,
            instruction,
        }
    }

    #[test]
    fn test_mint_to() {
        let req = request(SplTokenInstruction::MintTo {
            destination: TokenAccount::OwnerAta(OWNER),
            amount: 1_000_000,
        });
        let ix = build_instruction(&req, &TOKEN_PROGRAM_ID, &ProgramFamily::SplToken.interface())
            .unwrap();

        assert_eq!(ix.data, vec![7, 64, 66, 15, 0, 0, 0, 0, 0]);
        assert_eq!(ix.accounts[0].pubkey, USDC);
        assert_eq!(
            ix.accounts[1].pubkey,
            pubkey!("7WxnYBeMq4TrvQrTMfxKmY3mMRCAyeBqY128dPZuzPJJ")
        );
        assert!(ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
    }

    #[test]
    fn test_transfer_checked() {
        let dest = Pubkey::new_unique();
        let req = request(SplTokenInstruction::TransferChecked {
            source: None,
            destination: TokenAccount::Address(dest),
            amount: 5,
            decimals: 6,
        });
        assert_eq!(req.encode(), vec![12, 5, 0, 0, 0, 0, 0, 0, 0, 6]);

        let accounts = req.derive_accounts(&TOKEN_PROGRAM_ID).unwrap();
        assert_eq!(accounts.len(), 4);
        assert_eq!(
            accounts[0].pubkey,
            pubkey!("7WxnYBeMq4TrvQrTMfxKmY3mMRCAyeBqY128dPZuzPJJ")
        );
        assert_eq!(accounts[2].pubkey, dest);
    }

    #[test]
    fn test_set_authority() {
        let revoke = request(SplTokenInstruction::SetAuthority {
            account: None,
            authority_type: AuthorityType::MintTokens,
            new_authority: None,
        });
        assert_eq!(revoke.encode(), vec![6, 0, 0]);

        let new_owner = Pubkey::new_unique();
        let handover = request(SplTokenInstruction::SetAuthority {
            account: None,
            authority_type: AuthorityType::FreezeAccount,
            new_authority: Some(new_owner),
        });
        let data = handover.encode();
        assert_eq!(&data[..3], &[6, 1, 1]);
        assert_eq!(&data[3..], new_owner.as_ref());

        let accounts = handover.derive_accounts(&TOKEN_PROGRAM_ID).unwrap();
        assert_eq!(accounts[0].pubkey, USDC);
        assert!(accounts[0].is_writable);
    }

    #[test]
    fn test_authority_type_from_str() {
        assert_eq!("mint-tokens".parse::<AuthorityType>().unwrap(), AuthorityType::MintTokens);
        assert_eq!("CloseAccount".parse::<AuthorityType>().unwrap(), AuthorityType::CloseAccount);
        assert!("burn".parse::<AuthorityType>().is_err());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let req = request(SplTokenInstruction::MintTo {
            destination: TokenAccount::Address(Pubkey::new_unique()),
            amount: 0,
        });
        assert!(req.validate().is_err());
    }
}
