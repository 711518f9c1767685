use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use log::LevelFilter;
use solana_pubkey::Pubkey;

use crate::config::{Environment, GeneratorConfig, DEFAULT_COMMITMENT};
use crate::constants::programs::TOKEN_PROGRAM_ID;
use crate::errors::{GeneratorError, GeneratorResult};
use crate::output::OutputFormat;
use crate::programs::{
    AuthorityType, DestChainConfig, MetadataInstruction, MetadataRequest, ProgramFamily,
    ProgramRequest, RateLimitConfig, RemoteConfig, RouterInstruction, RouterRequest,
    SplTokenInstruction, SplTokenRequest, TokenAccount, TokenMetadata, TokenPoolInstruction,
    TokenPoolRequest,
};
use crate::utils::parse::{parse_pubkey, parse_pubkey_list, parse_remote_address};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("endpoint").required(true).multiple(true).args(["env", "rpc_url"])))]
pub struct Cli {
    /// Named cluster to talk to
    #[arg(long, env = "CCIP_TXGEN_ENV", value_enum)]
    pub env: Option<Environment>,

    /// Explicit RPC endpoint, takes precedence over --env
    #[arg(long, env = "CCIP_TXGEN_RPC_URL")]
    pub rpc_url: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_COMMITMENT)]
    pub commitment: String,

    /// Do not check node health before assembling
    #[arg(long, global = true)]
    pub skip_probe: bool,

    /// Anchor IDL to validate instruction names against
    #[arg(long, global = true)]
    pub idl: Option<PathBuf>,

    /// Address lookup table to compile against (repeatable)
    #[arg(long = "lookup-table", global = true)]
    pub lookup_tables: Vec<String>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[allow(clippy::large_enum_variant)]
#[derive(Subcommand, Debug)]
pub enum Commands {
    BurnmintPool(PoolArgs),
    LockreleasePool(PoolArgs),
    Router(RouterArgs),
    SplToken(SplTokenArgs),
    Metadata(MetadataArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Target program, defaults to the canonical deployment where one exists
    #[arg(long)]
    pub program_id: Option<String>,

    /// Signer the instruction is issued by (usually the multisig vault)
    #[arg(long)]
    pub authority: String,

    /// Defaults to the authority
    #[arg(long)]
    pub fee_payer: Option<String>,
}

#[derive(Args, Debug)]
pub struct PoolArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub mint: String,

    #[command(subcommand)]
    pub instruction: PoolCommand,
}

#[derive(Args, Debug, Clone)]
pub struct RateLimitArgs {
    #[arg(long)]
    pub inbound_enabled: bool,
    #[arg(long, default_value_t = 0)]
    pub inbound_capacity: u64,
    #[arg(long, default_value_t = 0)]
    pub inbound_rate: u64,
    #[arg(long)]
    pub outbound_enabled: bool,
    #[arg(long, default_value_t = 0)]
    pub outbound_capacity: u64,
    #[arg(long, default_value_t = 0)]
    pub outbound_rate: u64,
}

#[derive(Args, Debug, Clone)]
pub struct LiquidityArgs {
    #[arg(long)]
    pub amount: u64,
    #[arg(long)]
    pub token_program: Option<String>,
    /// Defaults to the authority's associated token account
    #[arg(long)]
    pub token_account: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PoolCommand {
    Initialize,
    TransferOwnership {
        #[arg(long)]
        proposed_owner: String,
    },
    AcceptOwnership,
    SetRouter {
        #[arg(long)]
        router: String,
    },
    InitChainRemoteConfig {
        #[arg(long)]
        remote_chain_selector: u64,
        /// Hex encoded remote token address
        #[arg(long)]
        token_address: String,
        #[arg(long)]
        decimals: u8,
    },
    EditChainRemoteConfig {
        #[arg(long)]
        remote_chain_selector: u64,
        /// Hex encoded remote pool address (repeatable)
        #[arg(long = "pool-address")]
        pool_addresses: Vec<String>,
        #[arg(long)]
        token_address: String,
        #[arg(long)]
        decimals: u8,
    },
    AppendRemotePoolAddresses {
        #[arg(long)]
        remote_chain_selector: u64,
        #[arg(long = "pool-address", required = true)]
        pool_addresses: Vec<String>,
    },
    SetChainRateLimit {
        #[arg(long)]
        remote_chain_selector: u64,
        #[command(flatten)]
        limits: RateLimitArgs,
    },
    DeleteChainConfig {
        #[arg(long)]
        remote_chain_selector: u64,
    },
    ConfigureAllowList {
        /// Comma separated addresses
        #[arg(long, default_value = "")]
        add: String,
        #[arg(long, action = ArgAction::Set, required = true)]
        enabled: bool,
    },
    RemoveFromAllowList {
        #[arg(long)]
        remove: String,
    },
    SetRebalancer {
        #[arg(long)]
        rebalancer: String,
    },
    SetCanAcceptLiquidity {
        #[arg(long, action = ArgAction::Set, required = true)]
        allow: bool,
    },
    ProvideLiquidity(LiquidityArgs),
    WithdrawLiquidity(LiquidityArgs),
}

#[derive(Args, Debug)]
pub struct RouterArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub instruction: RouterCommand,
}

#[derive(Args, Debug, Clone)]
pub struct DestChainArgs {
    #[arg(long)]
    pub chain_selector: u64,
    #[arg(long, default_value_t = 0)]
    pub lane_code_version: u8,
    #[arg(long = "allowed-sender")]
    pub allowed_senders: Vec<String>,
    #[arg(long)]
    pub allow_list_enabled: bool,
}

#[derive(Subcommand, Debug)]
pub enum RouterCommand {
    TransferOwnership {
        #[arg(long)]
        proposed_owner: String,
    },
    AcceptOwnership,
    AddChainSelector(DestChainArgs),
    UpdateDestChainConfig(DestChainArgs),
    OwnerProposeAdministrator {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        administrator: String,
    },
    TransferAdminRole {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        new_admin: String,
    },
    AcceptAdminRole {
        #[arg(long)]
        mint: String,
    },
    SetPool {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        pool_lookup_table: String,
        #[arg(long = "writable-index")]
        writable_indexes: Vec<u8>,
    },
}

#[derive(Args, Debug)]
pub struct SplTokenArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub mint: String,

    #[command(subcommand)]
    pub instruction: SplTokenCommand,
}

#[derive(Subcommand, Debug)]
pub enum SplTokenCommand {
    MintTo {
        /// Token account to credit
        #[arg(long, conflicts_with = "destination_owner")]
        destination: Option<String>,
        /// Credit this owner's associated token account instead
        #[arg(long)]
        destination_owner: Option<String>,
        #[arg(long)]
        amount: u64,
    },
    TransferChecked {
        #[arg(long)]
        source: Option<String>,
        #[arg(long, conflicts_with = "destination_owner")]
        destination: Option<String>,
        #[arg(long)]
        destination_owner: Option<String>,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        decimals: u8,
    },
    SetAuthority {
        /// Mint or token account, defaults to the mint
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        authority_type: String,
        /// Omit to revoke the authority
        #[arg(long)]
        new_authority: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub mint: String,

    #[command(subcommand)]
    pub instruction: MetadataCommand,
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommand {
    CreateMetadataAccountV3 {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        uri: String,
        #[arg(long, default_value_t = 0)]
        seller_fee_basis_points: u16,
        #[arg(long)]
        update_authority: Option<String>,
        #[arg(long)]
        immutable: bool,
    },
    UpdateMetadataAccountV2 {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        seller_fee_basis_points: Option<u16>,
        #[arg(long)]
        new_update_authority: Option<String>,
        #[arg(long)]
        primary_sale_happened: Option<bool>,
        #[arg(long)]
        is_mutable: Option<bool>,
    },
}

/// Everything needed to build one transaction, parsed and checked
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub request: ProgramRequest,
    pub program_id: Pubkey,
    pub fee_payer: Pubkey,
}

impl Cli {
    pub fn config(&self) -> GeneratorResult<GeneratorConfig> {
        let level = if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        };
        Ok(GeneratorConfig::from_endpoint(self.env, self.rpc_url.as_deref())?
            .with_commitment(&self.commitment)
            .with_log_level(level)
            .with_probe(!self.skip_probe))
    }

    pub fn lookup_tables(&self) -> GeneratorResult<Vec<Pubkey>> {
        self.lookup_tables
            .iter()
            .map(|s| parse_pubkey("lookup-table", s))
            .collect()
    }
}

impl Commands {
    pub fn family(&self) -> ProgramFamily {
        match self {
            Commands::BurnmintPool(_) => ProgramFamily::BurnMintTokenPool,
            Commands::LockreleasePool(_) => ProgramFamily::LockReleaseTokenPool,
            Commands::Router(_) => ProgramFamily::Router,
            Commands::SplToken(_) => ProgramFamily::SplToken,
            Commands::Metadata(_) => ProgramFamily::TokenMetadata,
        }
    }

    fn common(&self) -> &CommonArgs {
        match self {
            Commands::BurnmintPool(args) | Commands::LockreleasePool(args) => &args.common,
            Commands::Router(args) => &args.common,
            Commands::SplToken(args) => &args.common,
            Commands::Metadata(args) => &args.common,
        }
    }

    /// Parse every address and assemble the typed request
    pub fn resolve(&self) -> GeneratorResult<ResolvedCommand> {
        let family = self.family();
        let common = self.common();
        let program_id = match (&common.program_id, family.default_program_id()) {
            (Some(id), _) => parse_pubkey("program-id", id)?,
            (None, Some(default)) => default,
            (None, None) => {
                return Err(GeneratorError::invalid_argument(
                    "program-id",
                    format!("required for {}", family),
                ))
            }
        };
        let authority = parse_pubkey("authority", &common.authority)?;
        let fee_payer = match &common.fee_payer {
            Some(payer) => parse_pubkey("fee-payer", payer)?,
            None => authority,
        };

        let request = match self {
            Commands::BurnmintPool(args) | Commands::LockreleasePool(args) => {
                ProgramRequest::TokenPool(TokenPoolRequest {
                    family,
                    mint: parse_pubkey("mint", &args.mint)?,
                    authority,
                    instruction: args.instruction.to_instruction()?,
                })
            }
            Commands::Router(args) => ProgramRequest::Router(RouterRequest {
                authority,
                instruction: args.instruction.to_instruction()?,
            }),
            Commands::SplToken(args) => ProgramRequest::SplToken(SplTokenRequest {
                mint: parse_pubkey("mint", &args.mint)?,
                authority,
                instruction: args.instruction.to_instruction()?,
            }),
            Commands::Metadata(args) => ProgramRequest::Metadata(MetadataRequest {
                mint: parse_pubkey("mint", &args.mint)?,
                authority,
                instruction: args.instruction.to_instruction()?,
            }),
        };

        Ok(ResolvedCommand {
            request,
            program_id,
            fee_payer,
        })
    }
}

fn remote_addresses(field: &str, values: &[String]) -> GeneratorResult<Vec<Vec<u8>>> {
    values.iter().map(|v| parse_remote_address(field, v)).collect()
}

fn optional_pubkey(field: &str, value: &Option<String>) -> GeneratorResult<Option<Pubkey>> {
    value.as_deref().map(|v| parse_pubkey(field, v)).transpose()
}

impl LiquidityArgs {
    fn parts(&self) -> GeneratorResult<(u64, Pubkey, Option<Pubkey>)> {
        let token_program = optional_pubkey("token-program", &self.token_program)?.unwrap_or(TOKEN_PROGRAM_ID);
        Ok((
            self.amount,
            token_program,
            optional_pubkey("token-account", &self.token_account)?,
        ))
    }
}

impl PoolCommand {
    pub fn to_instruction(&self) -> GeneratorResult<TokenPoolInstruction> {
        let instruction = match self {
            PoolCommand::Initialize => TokenPoolInstruction::Initialize,
            PoolCommand::TransferOwnership { proposed_owner } => TokenPoolInstruction::TransferOwnership {
                proposed_owner: parse_pubkey("proposed-owner", proposed_owner)?,
            },
            PoolCommand::AcceptOwnership => TokenPoolInstruction::AcceptOwnership,
            PoolCommand::SetRouter { router } => TokenPoolInstruction::SetRouter {
                new_router: parse_pubkey("router", router)?,
            },
            PoolCommand::InitChainRemoteConfig {
                remote_chain_selector,
                token_address,
                decimals,
            } => TokenPoolInstruction::InitChainRemoteConfig {
                remote_chain_selector: *remote_chain_selector,
                config: RemoteConfig {
                    pool_addresses: vec![],
                    token_address: parse_remote_address("token-address", token_address)?,
                    decimals: *decimals,
                },
            },
            PoolCommand::EditChainRemoteConfig {
                remote_chain_selector,
                pool_addresses,
                token_address,
                decimals,
            } => TokenPoolInstruction::EditChainRemoteConfig {
                remote_chain_selector: *remote_chain_selector,
                config: RemoteConfig {
                    pool_addresses: remote_addresses("pool-address", pool_addresses)?,
                    token_address: parse_remote_address("token-address", token_address)?,
                    decimals: *decimals,
                },
            },
            PoolCommand::AppendRemotePoolAddresses {
                remote_chain_selector,
                pool_addresses,
            } => TokenPoolInstruction::AppendRemotePoolAddresses {
                remote_chain_selector: *remote_chain_selector,
                addresses: remote_addresses("pool-address", pool_addresses)?,
            },
            PoolCommand::SetChainRateLimit {
                remote_chain_selector,
                limits,
            } => TokenPoolInstruction::SetChainRateLimit {
                remote_chain_selector: *remote_chain_selector,
                inbound: RateLimitConfig {
                    enabled: limits.inbound_enabled,
                    capacity: limits.inbound_capacity,
                    rate: limits.inbound_rate,
                },
                outbound: RateLimitConfig {
                    enabled: limits.outbound_enabled,
                    capacity: limits.outbound_capacity,
                    rate: limits.outbound_rate,
                },
            },
            PoolCommand::DeleteChainConfig {
                remote_chain_selector,
            } => TokenPoolInstruction::DeleteChainConfig {
                remote_chain_selector: *remote_chain_selector,
            },
            PoolCommand::ConfigureAllowList { add, enabled } => TokenPoolInstruction::ConfigureAllowList {
                add: parse_pubkey_list("add", add)?,
                enabled: *enabled,
            },
            PoolCommand::RemoveFromAllowList { remove } => TokenPoolInstruction::RemoveFromAllowList {
                remove: parse_pubkey_list("remove", remove)?,
            },
            PoolCommand::SetRebalancer { rebalancer } => TokenPoolInstruction::SetRebalancer {
                rebalancer: parse_pubkey("rebalancer", rebalancer)?,
            },
            PoolCommand::SetCanAcceptLiquidity { allow } => {
                TokenPoolInstruction::SetCanAcceptLiquidity { allow: *allow }
            }
            PoolCommand::ProvideLiquidity(args) => {
                let (amount, token_program, token_account) = args.parts()?;
                TokenPoolInstruction::ProvideLiquidity {
                    amount,
                    token_program,
                    token_account,
                }
            }
            PoolCommand::WithdrawLiquidity(args) => {
                let (amount, token_program, token_account) = args.parts()?;
                TokenPoolInstruction::WithdrawLiquidity {
                    amount,
                    token_program,
                    token_account,
                }
            }
        };
        Ok(instruction)
    }
}

impl DestChainArgs {
    fn parts(&self) -> GeneratorResult<(u64, DestChainConfig)> {
        let allowed_senders = self
            .allowed_senders
            .iter()
            .map(|s| parse_pubkey("allowed-sender", s))
            .collect::<GeneratorResult<Vec<_>>>()?;
        Ok((
            self.chain_selector,
            DestChainConfig {
                lane_code_version: self.lane_code_version,
                allowed_senders,
                allow_list_enabled: self.allow_list_enabled,
            },
        ))
    }
}

impl RouterCommand {
    pub fn to_instruction(&self) -> GeneratorResult<RouterInstruction> {
        let instruction = match self {
            RouterCommand::TransferOwnership { proposed_owner } => RouterInstruction::TransferOwnership {
                proposed_owner: parse_pubkey("proposed-owner", proposed_owner)?,
            },
            RouterCommand::AcceptOwnership => RouterInstruction::AcceptOwnership,
            RouterCommand::AddChainSelector(args) => {
                let (chain_selector, config) = args.parts()?;
                RouterInstruction::AddChainSelector {
                    chain_selector,
                    config,
                }
            }
            RouterCommand::UpdateDestChainConfig(args) => {
                let (chain_selector, config) = args.parts()?;
                RouterInstruction::UpdateDestChainConfig {
                    chain_selector,
                    config,
                }
            }
            RouterCommand::OwnerProposeAdministrator {
                mint,
                administrator,
            } => RouterInstruction::OwnerProposeAdministrator {
                mint: parse_pubkey("mint", mint)?,
                administrator: parse_pubkey("administrator", administrator)?,
            },
            RouterCommand::TransferAdminRole { mint, new_admin } => RouterInstruction::TransferAdminRole {
                mint: parse_pubkey("mint", mint)?,
                new_admin: parse_pubkey("new-admin", new_admin)?,
            },
            RouterCommand::AcceptAdminRole { mint } => RouterInstruction::AcceptAdminRole {
                mint: parse_pubkey("mint", mint)?,
            },
            RouterCommand::SetPool {
                mint,
                pool_lookup_table,
                writable_indexes,
            } => RouterInstruction::SetPool {
                mint: parse_pubkey("mint", mint)?,
                pool_lookup_table: parse_pubkey("pool-lookup-table", pool_lookup_table)?,
                writable_indexes: writable_indexes.clone(),
            },
        };
        Ok(instruction)
    }
}

fn token_account(
    field: &str,
    address: &Option<String>,
    owner: &Option<String>,
) -> GeneratorResult<TokenAccount> {
    match (address, owner) {
        (Some(address), _) => Ok(TokenAccount::Address(parse_pubkey(field, address)?)),
        (None, Some(owner)) => Ok(TokenAccount::OwnerAta(parse_pubkey(field, owner)?)),
        (None, None) => Err(GeneratorError::invalid_argument(
            field,
            "pass either the token account or its owner",
        )),
    }
}

impl SplTokenCommand {
    pub fn to_instruction(&self) -> GeneratorResult<SplTokenInstruction> {
        let instruction = match self {
            SplTokenCommand::MintTo {
                destination,
                destination_owner,
                amount,
            } => SplTokenInstruction::MintTo {
                destination: token_account("destination", destination, destination_owner)?,
                amount: *amount,
            },
            SplTokenCommand::TransferChecked {
                source,
                destination,
                destination_owner,
                amount,
                decimals,
            } => SplTokenInstruction::TransferChecked {
                source: optional_pubkey("source", source)?.map(TokenAccount::Address),
                destination: token_account("destination", destination, destination_owner)?,
                amount: *amount,
                decimals: *decimals,
            },
            SplTokenCommand::SetAuthority {
                account,
                authority_type,
                new_authority,
            } => SplTokenInstruction::SetAuthority {
                account: optional_pubkey("account", account)?,
                authority_type: authority_type.parse::<AuthorityType>()?,
                new_authority: optional_pubkey("new-authority", new_authority)?,
            },
        };
        Ok(instruction)
    }
}

impl MetadataCommand {
    pub fn to_instruction(&self) -> GeneratorResult<MetadataInstruction> {
        let instruction = match self {
            MetadataCommand::CreateMetadataAccountV3 {
                name,
                symbol,
                uri,
                seller_fee_basis_points,
                update_authority,
                immutable,
            } => MetadataInstruction::CreateMetadataAccountV3 {
                data: TokenMetadata {
                    name: name.clone(),
                    symbol: symbol.clone(),
                    uri: uri.clone(),
                    seller_fee_basis_points: *seller_fee_basis_points,
                },
                update_authority: optional_pubkey("update-authority", update_authority)?,
                is_mutable: !immutable,
            },
            MetadataCommand::UpdateMetadataAccountV2 {
                name,
                symbol,
                uri,
                seller_fee_basis_points,
                new_update_authority,
                primary_sale_happened,
                is_mutable,
            } => {
                // The program replaces the data record as a whole
                let data = match (name, symbol, uri) {
                    (None, None, None) if seller_fee_basis_points.is_none() => None,
                    (Some(name), Some(symbol), Some(uri)) => Some(TokenMetadata {
                        name: name.clone(),
                        symbol: symbol.clone(),
                        uri: uri.clone(),
                        seller_fee_basis_points: seller_fee_basis_points.unwrap_or(0),
                    }),
                    _ => {
                        return Err(GeneratorError::invalid_argument(
                            "data",
                            "name, symbol and uri must be given together",
                        ))
                    }
                };
                MetadataInstruction::UpdateMetadataAccountV2 {
                    data,
                    new_update_authority: optional_pubkey("new-update-authority", new_update_authority)?,
                    primary_sale_happened: *primary_sale_happened,
                    is_mutable: *is_mutable,
                }
            }
        };
        Ok(instruction)
    }
}
