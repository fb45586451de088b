//! Deterministic record address derivation.

use {crate::constants::DERIVATION_NAMESPACE, solana_pubkey::Pubkey, solana_sha256_hasher::hashv};

/// Derives the address of the record identified by `tag` and `identity`.
///
/// Pure function of its inputs: the same tag and identity always produce the
/// same address, independent of store contents. Distinct tags partition the
/// address space, so the user record and the merchant record of one identity
/// never collide.
pub fn derive_record_address(tag: &[u8], identity: &Pubkey) -> Pubkey {
    let digest = hashv(&[DERIVATION_NAMESPACE, tag, identity.as_ref()]);
    Pubkey::new_from_array(digest.to_bytes())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::state::{MerchantRecord, UserRecord},
        proptest::prelude::*,
    };

    #[test]
    fn test_derivation_is_deterministic() {
        let identity = Pubkey::new_unique();
        assert_eq!(
            derive_record_address(UserRecord::SEED, &identity),
            derive_record_address(UserRecord::SEED, &identity),
        );
    }

    #[test]
    fn test_tags_partition_the_address_space() {
        let identity = Pubkey::new_unique();
        assert_ne!(
            derive_record_address(UserRecord::SEED, &identity),
            derive_record_address(MerchantRecord::SEED, &identity),
        );
    }

    #[test]
    fn test_identity_changes_the_address() {
        assert_ne!(
            derive_record_address(UserRecord::SEED, &Pubkey::new_unique()),
            derive_record_address(UserRecord::SEED, &Pubkey::new_unique()),
        );
    }

    #[test]
    fn test_derived_address_differs_from_identity() {
        let identity = Pubkey::new_unique();
        assert_ne!(derive_record_address(UserRecord::SEED, &identity), identity);
    }

    proptest! {
        #[test]
        fn test_distinct_identities_never_collide(
            a in any::<[u8; 32]>(),
            b in any::<[u8; 32]>(),
        ) {
            prop_assume!(a != b);
            let a = Pubkey::new_from_array(a);
            let b = Pubkey::new_from_array(b);
            prop_assert_ne!(
                derive_record_address(UserRecord::SEED, &a),
                derive_record_address(UserRecord::SEED, &b),
            );
        }
    }
}
