//! Supported program families
//!
//! Each family owns its interface descriptor, its instruction naming
//! convention and its account/data layouts. The family is resolved once
//! per command from a string tag; after that every instruction goes
//! through the same [`ProgramInstruction`] capability.

pub mod metadata;
pub mod router;
pub mod spl_token;
pub mod token_pool;

use std::collections::HashMap;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use serde::Serialize;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::codec::{self, Discriminator, Field};
use crate::constants::programs::{TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::errors::{ErrorContext, ErrorExt, GeneratorError, GeneratorResult};
use crate::models::ProgramInterface;

pub use self::metadata::{MetadataInstruction, MetadataRequest, TokenMetadata};
pub use self::router::{DestChainConfig, RouterInstruction, RouterRequest};
pub use self::spl_token::{AuthorityType, SplTokenInstruction, SplTokenRequest, TokenAccount};
pub use self::token_pool::{RateLimitConfig, RemoteConfig, TokenPoolInstruction, TokenPoolRequest};

/// Closed set of programs the generator knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProgramFamily {
    BurnMintTokenPool,
    LockReleaseTokenPool,
    Router,
    SplToken,
    TokenMetadata,
}

/// How a family spells its canonical instruction names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCase {
    LowerCamel,
    Snake,
}

static FAMILY_TAGS: Lazy<HashMap<&'static str, ProgramFamily>> = Lazy::new(|| {
    let mut tags = HashMap::new();
    for family in ProgramFamily::ALL {
        tags.insert(family.tag(), family);
    }
    tags.insert("burnmint", ProgramFamily::BurnMintTokenPool);
    tags.insert("lockrelease", ProgramFamily::LockReleaseTokenPool);
    tags.insert("token", ProgramFamily::SplToken);
    tags
});

impl ProgramFamily {
    pub const ALL: [ProgramFamily; 5] = [
        ProgramFamily::BurnMintTokenPool,
        ProgramFamily::LockReleaseTokenPool,
        ProgramFamily::Router,
        ProgramFamily::SplToken,
        ProgramFamily::TokenMetadata,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ProgramFamily::BurnMintTokenPool => "burnmint-pool",
            ProgramFamily::LockReleaseTokenPool => "lockrelease-pool",
            ProgramFamily::Router => "router",
            ProgramFamily::SplToken => "spl-token",
            ProgramFamily::TokenMetadata => "metadata",
        }
    }

    /// Resolve a family from its tag or one of its aliases
    pub fn from_tag(tag: &str) -> GeneratorResult<Self> {
        FAMILY_TAGS
            .get(tag.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| {
                GeneratorError::invalid_argument(
                    "program family",
                    format!(
                        "unknown family '{}', expected one of {}",
                        tag,
                        ProgramFamily::ALL.map(|f| f.tag()).join(", ")
                    ),
                )
            })
    }

    pub fn name_case(&self) -> NameCase {
        match self {
            ProgramFamily::Router => NameCase::Snake,
            _ => NameCase::LowerCamel,
        }
    }

    /// Built-in interface descriptor
    pub fn interface(&self) -> ProgramInterface {
        match self {
            ProgramFamily::BurnMintTokenPool => {
                ProgramInterface::new("burnmint_token_pool", token_pool::BASE_INSTRUCTIONS)
            }
            ProgramFamily::LockReleaseTokenPool => {
                let mut names = token_pool::BASE_INSTRUCTIONS.to_vec();
                names.extend_from_slice(token_pool::LOCKRELEASE_INSTRUCTIONS);
                ProgramInterface::new("lockrelease_token_pool", &names)
            }
            ProgramFamily::Router => ProgramInterface::new("ccip_router", router::INSTRUCTIONS),
            ProgramFamily::SplToken => ProgramInterface::new("spl_token", spl_token::INSTRUCTIONS),
            ProgramFamily::TokenMetadata => {
                ProgramInterface::new("token_metadata", metadata::INSTRUCTIONS)
            }
        }
    }

    /// Program identity used when the caller does not pass one
    pub fn default_program_id(&self) -> Option<Pubkey> {
        match self {
            ProgramFamily::SplToken => Some(TOKEN_PROGRAM_ID),
            ProgramFamily::TokenMetadata => Some(TOKEN_METADATA_PROGRAM_ID),
            _ => None,
        }
    }
}

impl fmt::Display for ProgramFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Shared capability of every supported instruction
pub trait ProgramInstruction {
    fn family(&self) -> ProgramFamily;

    /// Name exactly as the target program declares it
    fn canonical_name(&self) -> &'static str;

    /// Ordered account list the program expects
    fn derive_accounts(&self, program_id: &Pubkey) -> GeneratorResult<Vec<AccountMeta>>;

    /// Arguments in declaration order
    fn fields(&self) -> Vec<Field>;

    fn discriminator(&self) -> Discriminator {
        Discriminator::sighash(self.canonical_name())
    }

    /// Semantic checks the codec cannot do
    fn validate(&self) -> GeneratorResult<()> {
        Ok(())
    }

    fn encode(&self) -> Vec<u8> {
        codec::encode_with(self.discriminator(), &self.fields())
    }

    /// `<family>::<name>`, used in logs and output
    fn label(&self) -> String {
        format!("{}::{}", self.family(), self.canonical_name())
    }
}

/// Validate, derive accounts and encode one instruction
pub fn build_instruction(
    request: &dyn ProgramInstruction,
    program_id: &Pubkey,
    interface: &ProgramInterface,
) -> GeneratorResult<Instruction> {
    let context = ErrorContext::new("instruction_builder", "build_instruction")
        .program(program_id)
        .details(request.label());

    interface
        .ensure_instruction(request.canonical_name())
        .with_context(context.clone())?;
    request.validate().with_context(context.clone())?;
    let accounts = request.derive_accounts(program_id).with_context(context)?;
    let data = request.encode();

    debug!(
        "Built {} with {} accounts and {} data bytes",
        request.label(),
        accounts.len(),
        data.len()
    );

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// One request, for any family
#[derive(Debug, Clone)]
pub enum ProgramRequest {
    TokenPool(TokenPoolRequest),
    Router(RouterRequest),
    SplToken(SplTokenRequest),
    Metadata(MetadataRequest),
}

impl ProgramRequest {
    pub fn as_instruction(&self) -> &dyn ProgramInstruction {
        match self {
            ProgramRequest::TokenPool(r) => r,
            ProgramRequest::Router(r) => r,
            ProgramRequest::SplToken(r) => r,
            ProgramRequest::Metadata(r) => r,
        }
    }

    pub fn family(&self) -> ProgramFamily {
        self.as_instruction().family()
    }
}
