//! Data models shared across the generator

pub mod descriptor;
pub mod transaction;

pub use self::descriptor::ProgramInterface;
pub use self::transaction::{AccountSummary, FreshnessAnchor, GeneratedTransaction, SimulationOutcome};
