//! Token metadata (Metaplex) instructions

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use super::{ProgramFamily, ProgramInstruction};
use crate::accounts::AccountMetaBuilder;
use crate::codec::{Discriminator, Field};
use crate::constants::programs::SYSTEM_PROGRAM_ID;
use crate::derivation;
use crate::errors::{GeneratorError, GeneratorResult};

pub const INSTRUCTIONS: &[&str] = &["createMetadataAccountV3", "updateMetadataAccountV2"];

pub(crate) const UPDATE_METADATA_ACCOUNT_V2_TAG: u8 = 15;
pub(crate) const CREATE_METADATA_ACCOUNT_V3_TAG: u8 = 33;

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;
pub const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;

/// Descriptive token data. Creators, collection and uses are always
/// written as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
}

impl TokenMetadata {
    pub fn validate(&self) -> GeneratorResult<()> {
        check_len("name", &self.name, MAX_NAME_LENGTH)?;
        check_len("symbol", &self.symbol, MAX_SYMBOL_LENGTH)?;
        check_len("uri", &self.uri, MAX_URI_LENGTH)?;
        if self.seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
            return Err(GeneratorError::invalid_argument(
                "seller_fee_basis_points",
                format!("must be at most {}", MAX_SELLER_FEE_BASIS_POINTS),
            ));
        }
        Ok(())
    }

    fn field(&self) -> Field {
        Field::Struct(vec![
            Field::String(self.name.clone()),
            Field::String(self.symbol.clone()),
            Field::String(self.uri.clone()),
            Field::U16(self.seller_fee_basis_points),
            Field::none(), // creators
            Field::none(), // collection
            Field::none(), // uses
        ])
    }
}

fn check_len(name: &str, value: &str, max: usize) -> GeneratorResult<()> {
    if value.len() > max {
        return Err(GeneratorError::invalid_argument(
            name,
            format!("{} bytes, the maximum is {}", value.len(), max),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataInstruction {
    CreateMetadataAccountV3 {
        data: TokenMetadata,
        /// Defaults to the authority
        update_authority: Option<Pubkey>,
        is_mutable: bool,
    },
    UpdateMetadataAccountV2 {
        data: Option<TokenMetadata>,
        new_update_authority: Option<Pubkey>,
        primary_sale_happened: Option<bool>,
        is_mutable: Option<bool>,
    },
}

/// A metadata instruction for `mint`. On create, `authority` is the mint
/// authority and pays for the account; on update it is the update authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub instruction: MetadataInstruction,
}

impl ProgramInstruction for MetadataRequest {
    fn family(&self) -> ProgramFamily {
        ProgramFamily::TokenMetadata
    }

    fn canonical_name(&self) -> &'static str {
        match &self.instruction {
            MetadataInstruction::CreateMetadataAccountV3 { .. } => "createMetadataAccountV3",
            MetadataInstruction::UpdateMetadataAccountV2 { .. } => "updateMetadataAccountV2",
        }
    }

    fn discriminator(&self) -> Discriminator {
        Discriminator::Tag(match &self.instruction {
            MetadataInstruction::CreateMetadataAccountV3 { .. } => CREATE_METADATA_ACCOUNT_V3_TAG,
            MetadataInstruction::UpdateMetadataAccountV2 { .. } => UPDATE_METADATA_ACCOUNT_V2_TAG,
        })
    }

    fn validate(&self) -> GeneratorResult<()> {
        match &self.instruction {
            MetadataInstruction::CreateMetadataAccountV3 { data, .. } => data.validate(),
            MetadataInstruction::UpdateMetadataAccountV2 {
                data,
                new_update_authority,
                primary_sale_happened,
                is_mutable,
            } => {
                if data.is_none()
                    && new_update_authority.is_none()
                    && primary_sale_happened.is_none()
                    && is_mutable.is_none()
                {
                    return Err(GeneratorError::invalid_argument(
                        "updateMetadataAccountV2",
                        "nothing to update",
                    ));
                }
                data.as_ref().map_or(Ok(()), TokenMetadata::validate)
            }
        }
    }

    fn derive_accounts(&self, program_id: &Pubkey) -> GeneratorResult<Vec<AccountMeta>> {
        let metadata = derivation::metadata_account(program_id, &self.mint)?.address;

        let accounts = match &self.instruction {
            MetadataInstruction::CreateMetadataAccountV3 {
                update_authority, ..
            } => {
                let builder = AccountMetaBuilder::new()
                    .add_writable(metadata)
                    .add_read_only(self.mint)
                    .add_signer(self.authority)
                    .add_writable_signer(self.authority);
                let builder = match update_authority {
                    Some(other) if *other != self.authority => builder.add_read_only(*other),
                    _ => builder.add_signer(self.authority),
                };
                builder.add_read_only(SYSTEM_PROGRAM_ID).build()
            }
            MetadataInstruction::UpdateMetadataAccountV2 { .. } => AccountMetaBuilder::new()
                .add_writable(metadata)
                .add_signer(self.authority)
                .build(),
        };
        Ok(accounts)
    }

    fn fields(&self) -> Vec<Field> {
        match &self.instruction {
            MetadataInstruction::CreateMetadataAccountV3 {
                data, is_mutable, ..
            } => vec![
                data.field(),
                Field::Bool(*is_mutable),
                Field::none(), // collection details
            ],
            MetadataInstruction::UpdateMetadataAccountV2 {
                data,
                new_update_authority,
                primary_sale_happened,
                is_mutable,
            } => vec![
                Field::optional(data.as_ref().map(TokenMetadata::field)),
                Field::optional(new_update_authority.map(Field::Pubkey)),
                Field::optional(primary_sale_happened.map(Field::Bool)),
                Field::optional(is_mutable.map(Field::Bool)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::programs::TOKEN_METADATA_PROGRAM_ID;
    use crate::programs::build_instruction;
    use solana_pubkey::pubkey;

    const MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");
    const AUTHORITY: Pubkey = pubkey!("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");

    fn usdx() -> TokenMetadata {
        TokenMetadata {
            name: "USD X".to_string(),
            symbol: "USDX".to_string(),
            uri: "https://x.io".to_string(),
            seller_fee_basis_points: 0,
        }
    }

    #[test]
    fn test_create_metadata_v3() {
        let req = MetadataRequest {
            mint: MINT,
            authority: AUTHORITY,
            instruction: MetadataInstruction::CreateMetadataAccountV3 {
                data: usdx(),
                update_authority: None,
                is_mutable: true,
            },
        };
        let ix = build_instruction(
            &req,
            &TOKEN_METADATA_PROGRAM_ID,
            &ProgramFamily::TokenMetadata.interface(),
        )
        .unwrap();

        let mut expected = vec![33];
        expected.extend_from_slice(&[5, 0, 0, 0]);
        expected.extend_from_slice(b"USD X");
        expected.extend_from_slice(&[4, 0, 0, 0]);
        expected.extend_from_slice(b"USDX");
        expected.extend_from_slice(&[12, 0, 0, 0]);
        expected.extend_from_slice(b"https://x.io");
        expected.extend_from_slice(&[0, 0]); // fee
        expected.extend_from_slice(&[0, 0, 0]); // creators, collection, uses
        expected.extend_from_slice(&[1, 0]); // is_mutable, collection details
        assert_eq!(ix.data, expected);

        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(
            ix.accounts[0].pubkey,
            pubkey!("6dM4TqWyWJsbx7obrdLcviBkTafD5E8av61zfU6jq57X")
        );
        assert!(ix.accounts[3].is_signer && ix.accounts[3].is_writable);
        assert_eq!(ix.accounts[5].pubkey, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn test_update_metadata_v2() {
        let req = MetadataRequest {
            mint: MINT,
            authority: AUTHORITY,
            instruction: MetadataInstruction::UpdateMetadataAccountV2 {
                data: None,
                new_update_authority: None,
                primary_sale_happened: None,
                is_mutable: Some(false),
            },
        };
        assert_eq!(req.encode(), vec![15, 0, 0, 0, 1, 0]);
        assert_eq!(req.derive_accounts(&TOKEN_METADATA_PROGRAM_ID).unwrap().len(), 2);
    }

    #[test]
    fn test_limits() {
        let mut data = usdx();
        data.symbol = "TOOLONGSYMBOL".to_string();
        assert!(data.validate().is_err());

        let mut data = usdx();
        data.seller_fee_basis_points = 10_001;
        assert!(data.validate().is_err());

        let mut data = usdx();
        data.name = "n".repeat(MAX_NAME_LENGTH);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_empty_update_rejected() {
        let req = MetadataRequest {
            mint: MINT,
            authority: AUTHORITY,
            instruction: MetadataInstruction::UpdateMetadataAccountV2 {
                data: None,
                new_update_authority: None,
                primary_sale_happened: None,
                is_mutable: None,
            },
        };
        assert!(req.validate().is_err());
    }
}
