//! Constants used throughout the generator

pub mod anchor;
pub mod programs;
pub mod seeds;

/// Discriminator constants
pub mod discriminator {
    /// Namespace prefixed to instruction names before hashing
    pub const ANCHOR_DISCRIMINATOR_NAMESPACE: &str = "global";

    /// Length of an Anchor instruction discriminator
    pub const ANCHOR_DISCRIMINATOR_LENGTH: usize = 8;
}
