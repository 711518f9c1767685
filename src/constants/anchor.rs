//! Anchor framework error codes, used to explain failed dry-runs

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Common Anchor error codes
static ERROR_CODES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    let mut codes = HashMap::new();

    // Instruction errors (100-199)
    codes.insert(100, "InstructionMissing");
    codes.insert(101, "InstructionFallbackNotFound");
    codes.insert(102, "InstructionDidNotDeserialize");
    codes.insert(103, "InstructionDidNotSerialize");

    // Constraint errors (2000-2999)
    codes.insert(2000, "ConstraintMut");
    codes.insert(2001, "ConstraintHasOne");
    codes.insert(2002, "ConstraintSigner");
    codes.insert(2003, "ConstraintRaw");
    codes.insert(2004, "ConstraintOwner");
    codes.insert(2005, "ConstraintRentExempt");
    codes.insert(2006, "ConstraintSeeds");
    codes.insert(2007, "ConstraintExecutable");
    codes.insert(2008, "ConstraintState");
    codes.insert(2009, "ConstraintAssociated");
    codes.insert(2010, "ConstraintAssociatedInit");
    codes.insert(2011, "ConstraintClose");
    codes.insert(2012, "ConstraintAddress");
    codes.insert(2013, "ConstraintZero");
    codes.insert(2014, "ConstraintTokenMint");
    codes.insert(2015, "ConstraintTokenOwner");
    codes.insert(2016, "ConstraintMintMintAuthority");
    codes.insert(2017, "ConstraintMintFreezeAuthority");
    codes.insert(2018, "ConstraintMintDecimals");
    codes.insert(2019, "ConstraintSpace");

    // Account errors (3000-3999)
    codes.insert(3000, "AccountDiscriminatorAlreadySet");
    codes.insert(3001, "AccountDiscriminatorNotFound");
    codes.insert(3002, "AccountDiscriminatorMismatch");
    codes.insert(3003, "AccountDidNotDeserialize");
    codes.insert(3004, "AccountDidNotSerialize");
    codes.insert(3005, "AccountNotEnoughKeys");
    codes.insert(3006, "AccountNotMutable");
    codes.insert(3007, "AccountOwnedByWrongProgram");
    codes.insert(3008, "InvalidProgramId");
    codes.insert(3009, "InvalidProgramExecutable");
    codes.insert(3010, "AccountNotSigner");
    codes.insert(3011, "AccountNotSystemOwned");
    codes.insert(3012, "AccountNotInitialized");
    codes.insert(3013, "AccountNotProgramData");
    codes.insert(3014, "AccountNotAssociatedTokenAccount");
    codes.insert(3015, "AccountSysvarMismatch");

    // Used error codes (5000-5999)
    codes.insert(5000, "Deprecated");

    codes
});

/// Look up the framework name of an Anchor error code
pub fn error_name(code: u32) -> Option<&'static str> {
    ERROR_CODES.get(&code).copied()
}

/// First code available to program-defined errors
pub const CUSTOM_ERROR_OFFSET: u32 = 6000;
