//! Integration tests for the Rating component.
//!
//! Tests review-wallet authorization, the 1–5 bounds, reviewer rewards, and
//! append-only rating order.

use {
    crate::harness::CommerceHarness,
    assert_matches::assert_matches,
    bazaar_commerce_program::{CommerceError, CommerceInstruction},
    bazaar_ledger::SignerSet,
    solana_pubkey::Pubkey,
};

/// A deployment with one merchant and one reviewer already registered.
fn harness_with_merchant() -> (CommerceHarness, Pubkey, Pubkey) {
    let mut harness = CommerceHarness::new();
    let merchant = Pubkey::new_unique();
    let reviewer = Pubkey::new_unique();
    harness.register_user(merchant);
    harness.register_merchant(merchant);
    harness.register_user(reviewer);
    (harness, merchant, reviewer)
}

// ═══════════════════════════════════════════════════════════════════════════
//  1. Rating submission
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rating_appends_and_rewards_reviewer() {
    let (mut harness, merchant, reviewer) = harness_with_merchant();

    harness.add_rating(merchant, reviewer, 5).unwrap();

    assert_eq!(harness.merchant_record(&merchant).ratings, vec![5]);
    assert_eq!(harness.user_record(&reviewer).exp_points, 120);
}

#[test]
fn test_ratings_preserve_submission_order() {
    let (mut harness, merchant, reviewer) = harness_with_merchant();
    let second_reviewer = Pubkey::new_unique();
    harness.register_user(second_reviewer);

    harness.add_rating(merchant, reviewer, 5).unwrap();
    harness.add_rating(merchant, second_reviewer, 3).unwrap();
    harness.add_rating(merchant, reviewer, 5).unwrap();

    assert_eq!(harness.merchant_record(&merchant).ratings, vec![5, 3, 5]);
}

#[test]
fn test_repeat_reviewer_earns_each_time() {
    let (mut harness, merchant, reviewer) = harness_with_merchant();

    harness.add_rating(merchant, reviewer, 4).unwrap();
    harness.add_rating(merchant, reviewer, 2).unwrap();
    harness.add_rating(merchant, reviewer, 4).unwrap();

    // Base 100 plus three 20-point rewards.
    assert_eq!(harness.user_record(&reviewer).exp_points, 160);
}

#[test]
fn test_merchant_owner_may_review_own_merchant() {
    // No self-review restriction exists at this layer.
    let (mut harness, merchant, _) = harness_with_merchant();

    harness.add_rating(merchant, merchant, 4).unwrap();

    assert_eq!(harness.merchant_record(&merchant).ratings, vec![4]);
    assert_eq!(harness.user_record(&merchant).exp_points, 120);
}

// ═══════════════════════════════════════════════════════════════════════════
//  2. Validation bounds
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rating_bounds_enforced() {
    let (mut harness, merchant, reviewer) = harness_with_merchant();

    assert_matches!(
        harness.add_rating(merchant, reviewer, 0),
        Err(CommerceError::InvalidRating)
    );
    assert_matches!(
        harness.add_rating(merchant, reviewer, 6),
        Err(CommerceError::InvalidRating)
    );
    assert!(harness.merchant_record(&merchant).ratings.is_empty());
    assert_eq!(harness.user_record(&reviewer).exp_points, 100);
}

#[test]
fn test_rating_boundary_values_accepted() {
    let (mut harness, merchant, reviewer) = harness_with_merchant();

    harness.add_rating(merchant, reviewer, 1).unwrap();
    harness.add_rating(merchant, reviewer, 5).unwrap();

    assert_eq!(harness.merchant_record(&merchant).ratings, vec![1, 5]);
}

#[test]
fn test_bounds_checked_before_authorization() {
    // An out-of-range rating fails the same way no matter who signed it.
    let (mut harness, merchant, reviewer) = harness_with_merchant();
    let stranger = Pubkey::new_unique();

    let instruction = CommerceInstruction::AddRating {
        state: harness.state_address,
        merchant,
        reviewer,
        rating: 6,
    };
    let result = harness.process(&SignerSet::single(stranger), instruction);

    assert_matches!(result, Err(CommerceError::InvalidRating));
}

// ═══════════════════════════════════════════════════════════════════════════
//  3. Authorization
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rating_requires_review_wallet() {
    let (mut harness, merchant, reviewer) = harness_with_merchant();

    for signer in [merchant, reviewer, Pubkey::new_unique()] {
        let instruction = CommerceInstruction::AddRating {
            state: harness.state_address,
            merchant,
            reviewer,
            rating: 5,
        };
        let result = harness.process(&SignerSet::single(signer), instruction);
        assert_matches!(result, Err(CommerceError::Unauthorized));
    }

    assert!(harness.merchant_record(&merchant).ratings.is_empty());
    assert_eq!(harness.user_record(&reviewer).exp_points, 100);
}

// ═══════════════════════════════════════════════════════════════════════════
//  4. Atomicity
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rating_unknown_merchant_rejected() {
    let mut harness = CommerceHarness::new();
    let reviewer = Pubkey::new_unique();
    harness.register_user(reviewer);

    let result = harness.add_rating(Pubkey::new_unique(), reviewer, 5);

    assert_matches!(result, Err(CommerceError::MerchantNotFound));
    assert_eq!(harness.user_record(&reviewer).exp_points, 100);
}

#[test]
fn test_rating_unknown_reviewer_leaves_merchant_untouched() {
    let (mut harness, merchant, _) = harness_with_merchant();
    let ghost = Pubkey::new_unique();

    let result = harness.add_rating(merchant, ghost, 5);

    assert_matches!(result, Err(CommerceError::UserNotFound));
    assert!(harness.merchant_record(&merchant).ratings.is_empty());
}
