//! Error handling for the transaction generator.
//!
//! Errors fall into three operator-facing categories:
//!
//! * configuration errors, detected before any network call (bad addresses,
//!   oversized seeds, unknown instruction names);
//! * connectivity errors, raised when the node cannot be reached while
//!   fetching a blockhash or dry-running;
//! * internal errors, for serialization or I/O failures.
//!
//! A dry-run that the node *executes* but the program rejects is not an
//! error at all; it is reported through
//! [`SimulationOutcome`](crate::models::transaction::SimulationOutcome).

use std::fmt;
use thiserror::Error;

/// Main error type for the transaction generator.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A user supplied address could not be parsed.
    #[error("Invalid address for {field}: '{value}' ({reason})")]
    InvalidAddress {
        field: String,
        value: String,
        reason: String,
    },

    /// A derivation seed exceeds the per-seed byte limit.
    #[error("Seed {index} is {len} bytes long, the maximum is {max}")]
    SeedTooLong { index: usize, len: usize, max: usize },

    /// Too many seed components for a single derivation.
    #[error("{count} seeds supplied, at most {max} are allowed")]
    TooManySeeds { count: usize, max: usize },

    /// No bump produced an off-curve address.
    #[error("Unable to find a viable bump for program {program_id}")]
    NoViableBump { program_id: String },

    /// The requested instruction is not part of the program interface.
    #[error("Instruction '{instruction}' is not defined by program '{program}' (known: {known})")]
    UnknownInstruction {
        program: String,
        instruction: String,
        known: String,
    },

    /// An instruction argument failed validation in the glue layer.
    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Message compilation failed (too many accounts, bad lookup tables).
    #[error("Message compilation error: {0}")]
    Compile(String),

    /// The node could not be reached or returned a transport-level error.
    #[error("RPC error at {endpoint}: {message}")]
    Rpc { endpoint: String, message: String },

    /// Errors related to file I/O, such as a missing IDL file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON or binary serialization failures.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An error annotated with where it happened.
    #[error("{context}: {source}")]
    Context {
        context: ErrorContext,
        #[source]
        source: Box<GeneratorError>,
    },
}

/// Result type alias for the transaction generator.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Operator-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, caught before touching the network.
    Configuration,
    /// The node could not be reached.
    Connectivity,
    /// Serialization or I/O failure inside the tool.
    Internal,
}

impl GeneratorError {
    /// Classify the error, looking through any attached context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeneratorError::InvalidAddress { .. }
            | GeneratorError::SeedTooLong { .. }
            | GeneratorError::TooManySeeds { .. }
            | GeneratorError::NoViableBump { .. }
            | GeneratorError::UnknownInstruction { .. }
            | GeneratorError::InvalidArgument { .. }
            | GeneratorError::Compile(_) => ErrorKind::Configuration,
            GeneratorError::Rpc { .. } => ErrorKind::Connectivity,
            GeneratorError::Io(_) | GeneratorError::Serialization(_) => ErrorKind::Internal,
            GeneratorError::Context { source, .. } => source.kind(),
        }
    }

    /// Strip context wrappers and return the underlying error.
    pub fn root(&self) -> &GeneratorError {
        match self {
            GeneratorError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        GeneratorError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(e: serde_json::Error) -> Self {
        GeneratorError::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for GeneratorError {
    fn from(e: bincode::Error) -> Self {
        GeneratorError::Serialization(e.to_string())
    }
}

/// Context information for errors.
///
/// Says which component was doing what, and for which program, so an
/// operator can fix the input without re-running with debug logging.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Program ID being targeted, if applicable.
    pub program_id: Option<String>,

    /// Component where the error occurred (e.g., "transaction_assembler").
    pub component: String,

    /// Operation being performed when the error occurred (e.g., "fetch_blockhash").
    pub operation: String,

    /// Additional context details, such as the instruction name.
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            program_id: None,
            component: component.to_string(),
            operation: operation.to_string(),
            details: None,
        }
    }

    pub fn program(mut self, program_id: impl ToString) -> Self {
        self.program_id = Some(program_id.to_string());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "In {} while {}", self.component, self.operation)?;
        if let Some(program_id) = &self.program_id {
            write!(f, " for program {}", program_id)?;
        }
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorExt<T> {
    /// Add context to an error.
    fn with_context(self, context: ErrorContext) -> GeneratorResult<T>;

    /// Add component and operation only.
    fn with_simple_context(self, component: &str, operation: &str) -> GeneratorResult<T>;
}

impl<T> ErrorExt<T> for GeneratorResult<T> {
    fn with_context(self, context: ErrorContext) -> GeneratorResult<T> {
        self.map_err(|e| GeneratorError::Context {
            context,
            source: Box::new(e),
        })
    }

    fn with_simple_context(self, component: &str, operation: &str) -> GeneratorResult<T> {
        self.with_context(ErrorContext::new(component, operation))
    }
}
