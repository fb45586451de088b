//! Transport-verified signer identities for a single request.

use {solana_pubkey::Pubkey, std::collections::BTreeSet};

/// The set of identities whose signatures the transport verified for the
/// request being processed.
///
/// Programs check membership here before mutating any record; they never see
/// signatures themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignerSet {
    signers: BTreeSet<Pubkey>,
}

impl SignerSet {
    /// An empty set: no identity signed the request.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing exactly one signer.
    pub fn single(signer: Pubkey) -> Self {
        Self {
            signers: BTreeSet::from([signer]),
        }
    }

    /// Returns true if `identity` signed the request.
    pub fn contains(&self, identity: &Pubkey) -> bool {
        self.signers.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl<const N: usize> From<[Pubkey; N]> for SignerSet {
    fn from(signers: [Pubkey; N]) -> Self {
        Self {
            signers: BTreeSet::from(signers),
        }
    }
}

impl FromIterator<Pubkey> for SignerSet {
    fn from_iter<I: IntoIterator<Item = Pubkey>>(iter: I) -> Self {
        Self {
            signers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_only_listed_signers() {
        let authority = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();

        let signers = SignerSet::single(authority);
        assert!(signers.contains(&authority));
        assert!(!signers.contains(&stranger));
        assert_eq!(signers.len(), 1);
    }

    #[test]
    fn test_empty_set_contains_nothing() {
        let signers = SignerSet::new();
        assert!(signers.is_empty());
        assert!(!signers.contains(&Pubkey::new_unique()));
    }

    #[test]
    fn test_from_array_deduplicates() {
        let authority = Pubkey::new_unique();
        let cosigner = Pubkey::new_unique();

        let signers = SignerSet::from([authority, cosigner, authority]);
        assert_eq!(signers.len(), 2);
        assert!(signers.contains(&authority));
        assert!(signers.contains(&cosigner));
    }
}
