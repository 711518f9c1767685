//! Hashing utilities

use sha2::{Digest, Sha256};

use crate::constants::discriminator::{ANCHOR_DISCRIMINATOR_LENGTH, ANCHOR_DISCRIMINATOR_NAMESPACE};

/// Generate an Anchor instruction discriminator from a name.
///
/// The name is hashed exactly as given; callers pick the casing the target
/// program declares.
pub fn generate_anchor_discriminator(name: &str) -> [u8; ANCHOR_DISCRIMINATOR_LENGTH] {
    let namespace = format!("{}:{}", ANCHOR_DISCRIMINATOR_NAMESPACE, name);
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    let hash = hasher.finalize();

    let mut result = [0u8; ANCHOR_DISCRIMINATOR_LENGTH];
    result.copy_from_slice(&hash[..ANCHOR_DISCRIMINATOR_LENGTH]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_discriminators() {
        assert_eq!(
            generate_anchor_discriminator("initialize"),
            [175, 175, 109, 31, 13, 152, 155, 237]
        );
        assert_eq!(
            generate_anchor_discriminator("acceptOwnership"),
            [30, 43, 213, 84, 172, 203, 104, 84]
        );
        assert_eq!(
            generate_anchor_discriminator("accept_ownership"),
            [172, 23, 43, 13, 238, 213, 85, 150]
        );
    }
}
