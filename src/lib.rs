//! Unsigned transaction generation for CCIP on Solana
//!
//! Builds administrative instructions for the CCIP token pool programs, the
//! CCIP router, SPL Token and Token Metadata, compiles them into a v0
//! transaction with empty signature slots, dry-runs it against a node and
//! encodes the bytes for import into a multisig. Nothing is ever signed or
//! submitted.

pub mod accounts;
pub mod assembler;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod derivation;
pub mod errors;
pub mod models;
pub mod node;
pub mod output;
pub mod programs;
pub mod utils;

use log::info;
use solana_pubkey::Pubkey;

use crate::assembler::TransactionAssembler;
use crate::errors::GeneratorResult;
use crate::models::{GeneratedTransaction, ProgramInterface};
use crate::node::Node;
use crate::programs::{build_instruction, ProgramRequest};

/// Build one instruction and assemble it into a dry-run transaction.
///
/// Everything that can be checked offline (addresses, instruction name,
/// arguments, seeds) is checked before the node is contacted.
pub async fn generate<N: Node + ?Sized>(
    node: &N,
    request: &ProgramRequest,
    program_id: &Pubkey,
    fee_payer: &Pubkey,
    interface: &ProgramInterface,
    lookup_tables: &[Pubkey],
) -> GeneratorResult<GeneratedTransaction> {
    let instruction = request.as_instruction();
    let ix = build_instruction(instruction, program_id, interface)?;
    info!("Assembling {} for program {}", instruction.label(), program_id);

    let assembler = TransactionAssembler::new(node)
        .load_lookup_tables(lookup_tables)
        .await?;
    assembler.assemble(&instruction.label(), &[ix], fee_payer).await
}

/// Version of the transaction generator
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
