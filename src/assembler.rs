//! Offline transaction assembly
//!
//! Fetch a freshness anchor, compile a v0 message, serialize it with empty
//! signature slots and dry-run it. The transaction is never signed and
//! never submitted.

use log::{debug, info, warn};
use solana_instruction::Instruction;
use solana_message::{v0, AddressLookupTableAccount, VersionedMessage};
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;

use crate::errors::{ErrorContext, ErrorExt, GeneratorError, GeneratorResult};
use crate::models::{AccountSummary, GeneratedTransaction};
use crate::node::{self, Node};

pub struct TransactionAssembler<'a, N: Node + ?Sized> {
    node: &'a N,
    lookup_tables: Vec<AddressLookupTableAccount>,
}

impl<'a, N: Node + ?Sized> TransactionAssembler<'a, N> {
    pub fn new(node: &'a N) -> Self {
        Self {
            node,
            lookup_tables: Vec::new(),
        }
    }

    pub fn with_lookup_tables(mut self, tables: Vec<AddressLookupTableAccount>) -> Self {
        self.lookup_tables = tables;
        self
    }

    /// Fetch lookup tables by address and use them for compilation
    pub async fn load_lookup_tables(mut self, keys: &[Pubkey]) -> GeneratorResult<Self> {
        for key in keys {
            let table = node::fetch_lookup_table(self.node, key)
                .await
                .with_simple_context("transaction_assembler", "load_lookup_tables")?;
            self.lookup_tables.push(table);
        }
        Ok(self)
    }

    /// Build, serialize and dry-run a transaction.
    ///
    /// `label` and the account view describe the first instruction.
    pub async fn assemble(
        &self,
        label: &str,
        instructions: &[Instruction],
        fee_payer: &Pubkey,
    ) -> GeneratorResult<GeneratedTransaction> {
        let first = instructions
            .first()
            .ok_or_else(|| GeneratorError::invalid_argument("instructions", "nothing to assemble"))?;
        let context = ErrorContext::new("transaction_assembler", "assemble")
            .program(&first.program_id)
            .details(label);

        let anchor = self
            .node
            .latest_blockhash()
            .await
            .with_context(context.clone())?;

        let message = v0::Message::try_compile(
            fee_payer,
            instructions,
            &self.lookup_tables,
            anchor.blockhash,
        )
        .map_err(|e| GeneratorError::Compile(e.to_string()))
        .with_context(context.clone())?;

        let signatures = vec![Signature::default(); message.header.num_required_signatures as usize];
        let transaction = VersionedTransaction {
            signatures,
            message: VersionedMessage::V0(message),
        };
        let bytes = bincode::serialize(&transaction)
            .map_err(GeneratorError::from)
            .with_context(context.clone())?;
        debug!(
            "Compiled {} into {} bytes with {} signature slots",
            label,
            bytes.len(),
            transaction.signatures.len()
        );

        let simulation = self.node.simulate(&bytes).await.with_context(context)?;
        if simulation.success {
            info!("Dry-run of {} succeeded", label);
        } else {
            warn!(
                "Dry-run of {} failed: {}",
                label,
                simulation.error.as_deref().unwrap_or("unknown error")
            );
        }

        Ok(GeneratedTransaction {
            label: label.to_string(),
            program_id: first.program_id,
            fee_payer: *fee_payer,
            anchor,
            bytes,
            accounts: first.accounts.iter().map(AccountSummary::from).collect(),
            simulation,
        })
    }
}
