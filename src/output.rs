//! Rendering of generated transactions
//!
//! Both encodings carry the same bytes: base-58 for multisig UIs that
//! import it, lowercase hex for inspection.

use std::fmt::Write;

use serde::Serialize;

use crate::errors::GeneratorResult;
use crate::models::GeneratedTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The two textual forms of one serialized transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedTransaction {
    pub base58: String,
    pub hex: String,
}

impl EncodedTransaction {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            base58: bs58::encode(bytes).into_string(),
            hex: hex::encode(bytes),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    transaction: &'a GeneratedTransaction,
    size: usize,
    encoded: EncodedTransaction,
}

pub fn render(transaction: &GeneratedTransaction, format: OutputFormat) -> GeneratorResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(transaction)),
        OutputFormat::Json => render_json(transaction),
    }
}

pub fn render_json(transaction: &GeneratedTransaction) -> GeneratorResult<String> {
    let report = Report {
        transaction,
        size: transaction.bytes.len(),
        encoded: EncodedTransaction::new(&transaction.bytes),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render_text(transaction: &GeneratedTransaction) -> String {
    let encoded = EncodedTransaction::new(&transaction.bytes);
    let simulation = &transaction.simulation;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Instruction:  {}", transaction.label);
    let _ = writeln!(out, "Program:      {}", transaction.program_id);
    let _ = writeln!(out, "Fee payer:    {}", transaction.fee_payer);
    let _ = writeln!(
        out,
        "Blockhash:    {} (valid until block height {})",
        transaction.anchor.blockhash, transaction.anchor.last_valid_block_height
    );
    let _ = writeln!(out, "Size:         {} bytes", transaction.bytes.len());

    let _ = writeln!(out, "\nAccounts:");
    for (index, account) in transaction.accounts.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}  {:<44}  {:<6}  {}",
            index,
            account.address,
            if account.is_signer { "signer" } else { "" },
            if account.is_writable { "writable" } else { "readonly" }
        );
    }

    if simulation.success {
        let _ = writeln!(out, "\nDry-run:      success");
    } else {
        let error = simulation.error.as_deref().unwrap_or("unknown error");
        match simulation.error_name() {
            Some(name) => {
                let _ = writeln!(out, "\nDry-run:      FAILED {} ({})", error, name);
            }
            None => {
                let _ = writeln!(out, "\nDry-run:      FAILED {}", error);
            }
        }
    }
    if let Some(units) = simulation.units_consumed {
        let _ = writeln!(out, "Compute units: {}", units);
    }
    if let Some(logs) = &simulation.logs {
        let _ = writeln!(out, "Logs:");
        for line in logs {
            let _ = writeln!(out, "  {}", line);
        }
    }

    let _ = writeln!(out, "\nBase58:\n{}", encoded.base58);
    let _ = writeln!(out, "\nHex:\n{}", encoded.hex);
    out
}
