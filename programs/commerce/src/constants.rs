//! Program-wide constants for the Bazaar Commerce program.
//!
//! The experience-point schedule and the rating bounds are business rules
//! shared with off-chain indexers; changing any of them is a breaking change.

// ---------------------------------------------------------------------------
// Address derivation
// ---------------------------------------------------------------------------

/// Namespace folded into every derived record address so Bazaar records can
/// never collide with records derived by other programs.
pub const DERIVATION_NAMESPACE: &[u8] = b"bazaar-commerce";

// ---------------------------------------------------------------------------
// Experience points
// ---------------------------------------------------------------------------

/// EXP granted to a freshly registered user.
pub const INITIAL_USER_EXP: u32 = 100;

/// EXP granted to a freshly registered user who named a referrer.
pub const REFERRED_USER_INITIAL_EXP: u32 = 150;

/// EXP credited to the referrer when a user they referred registers.
pub const REFERRAL_BONUS_EXP: u32 = 50;

/// EXP credited to the reviewer for each accepted rating.
pub const RATING_REWARD_EXP: u32 = 20;

/// EXP credited to a user for a merchant milestone acknowledged by the
/// merchant-identity service.
pub const MERCHANT_REWARD_EXP: u32 = 100;

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Lowest accepted rating value.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating value.
pub const MAX_RATING: u8 = 5;

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// Basis-point denominator: 10_000 bps is 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Highest configurable transaction fee, in basis points.
pub const MAX_TRANSACTION_FEE_BPS: u16 = 10_000;

/// Smallest amount `ExecuteTransaction` will settle, in settlement-mint base
/// units.
pub const MIN_TRANSACTION_AMOUNT: u64 = 10_000;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Longest serialized request the program will decode, matching the transport
/// packet size.
pub const MAX_REQUEST_LEN: u64 = 1232;
