//! Ordered account list construction
//!
//! Programs read their accounts by position, so the order of calls here is
//! the order the program sees. The builder records exactly what it is
//! told: no deduplication, no reordering, no checks.

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

#[derive(Debug, Default, Clone)]
pub struct AccountMetaBuilder {
    metas: Vec<AccountMeta>,
}

impl AccountMetaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only signer
    pub fn add_signer(mut self, pubkey: Pubkey) -> Self {
        self.metas.push(AccountMeta::new_readonly(pubkey, true));
        self
    }

    /// Writable signer, typically the authority paying for new accounts
    pub fn add_writable_signer(mut self, pubkey: Pubkey) -> Self {
        self.metas.push(AccountMeta::new(pubkey, true));
        self
    }

    pub fn add_writable(mut self, pubkey: Pubkey) -> Self {
        self.metas.push(AccountMeta::new(pubkey, false));
        self
    }

    pub fn add_read_only(mut self, pubkey: Pubkey) -> Self {
        self.metas.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    pub fn build(self) -> Vec<AccountMeta> {
        self.metas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_flags_preserved() {
        let a = Pubkey::new_from_array([1; 32]);
        let b = Pubkey::new_from_array([2; 32]);
        let c = Pubkey::new_from_array([3; 32]);

        let metas = AccountMetaBuilder::new()
            .add_writable(c)
            .add_read_only(a)
            .add_signer(b)
            .add_writable_signer(a)
            .build();

        let flags: Vec<_> = metas
            .iter()
            .map(|m| (m.pubkey, m.is_signer, m.is_writable))
            .collect();
        assert_eq!(
            flags,
            vec![
                (c, false, true),
                (a, false, false),
                (b, true, false),
                (a, true, true),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let key = Pubkey::new_from_array([7; 32]);
        let metas = AccountMetaBuilder::new()
            .add_read_only(key)
            .add_read_only(key)
            .build();
        assert_eq!(metas.len(), 2);
    }
}
