//! Bazaar Integration Tests
//!
//! End-to-end test suite for the Commerce program, driven through the real
//! request dispatch path against an in-memory record store and token ledger.
//!
//! # Components Tested
//!
//! 1. **Initialization** — singleton program state, fee-rate bounds,
//!    create-once semantics, wire decoding
//! 2. **Users** — registration, referral bonuses, sponsored onboarding,
//!    existence checks
//! 3. **Merchants** — registration, referrer validation, the merchant
//!    counter, milestone EXP awards
//! 4. **Ratings** — review-wallet authorization, 1–5 bounds, reviewer
//!    rewards
//! 5. **Settlement** — basis-point fees, balance movement, treasury
//!    routing, atomicity

pub mod harness;




#[cfg(test)]
mod rating_tests;
