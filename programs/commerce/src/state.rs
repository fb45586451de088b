//! Record types stored by the Bazaar Commerce program.
//!
//! Every record is serialized with borsh behind a one-byte discriminator so a
//! record loaded from the wrong address fails decoding instead of aliasing
//! another record type.

use {
    crate::error::CommerceError,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

/// Discriminator of the singleton [`ProgramState`] record.
pub const PROGRAM_STATE_DISCRIMINATOR: u8 = 1;

/// Discriminator of [`UserRecord`] records.
pub const USER_RECORD_DISCRIMINATOR: u8 = 2;

/// Discriminator of [`MerchantRecord`] records.
pub const MERCHANT_RECORD_DISCRIMINATOR: u8 = 3;

fn deserialize_record<T: BorshDeserialize>(
    data: &[u8],
    discriminator: u8,
) -> Result<T, CommerceError> {
    let Some((&tag, rest)) = data.split_first() else {
        return Err(CommerceError::InvalidAccountData);
    };
    if tag != discriminator {
        return Err(CommerceError::InvalidAccountData);
    }
    let mut reader = rest;
    T::deserialize_reader(&mut reader).map_err(|_| CommerceError::InvalidAccountData)
}

fn serialize_record<T: BorshSerialize>(
    record: &T,
    discriminator: u8,
    capacity: usize,
) -> Result<Vec<u8>, CommerceError> {
    let mut data = Vec::with_capacity(capacity);
    data.push(discriminator);
    record
        .serialize(&mut data)
        .map_err(|_| CommerceError::InvalidAccountData)?;
    Ok(data)
}

/// Singleton configuration record, created once at deployment.
///
/// Record data layout:
///
/// | offset | size | field                      |
/// | ------ | ---- | -------------------------- |
/// | 0      | 1    | discriminator              |
/// | 1      | 32   | owner                      |
/// | 33     | 32   | dao                        |
/// | 65     | 32   | onboarding_service_wallet  |
/// | 97     | 32   | merchant_id_service_wallet |
/// | 129    | 32   | transaction_service_wallet |
/// | 161    | 32   | review_service_wallet      |
/// | 193    | 32   | settlement_mint            |
/// | 225    | 2    | transaction_fee_bps        |
/// | 227    | 8    | merchant_counter           |
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgramState {
    /// Identity that created the deployment.
    pub owner: Pubkey,
    /// DAO identity; settlement fees accrue to a token account it owns.
    pub dao: Pubkey,
    /// Service identity allowed to co-sign user registration.
    pub onboarding_service_wallet: Pubkey,
    /// Service identity allowed to co-sign merchant registration and award
    /// merchant milestone EXP.
    pub merchant_id_service_wallet: Pubkey,
    /// Service identity allowed to co-sign settlement.
    pub transaction_service_wallet: Pubkey,
    /// Service identity that submits ratings on behalf of reviewers.
    pub review_service_wallet: Pubkey,
    /// Mint every settlement moves base units of (USDC in production).
    pub settlement_mint: Pubkey,
    /// Settlement fee in basis points, at most 10_000.
    pub transaction_fee_bps: u16,
    /// Number of merchants ever registered.
    pub merchant_counter: u64,
}

impl ProgramState {
    pub const SERIALIZED_SIZE: usize = 235;

    pub fn deserialize(data: &[u8]) -> Result<Self, CommerceError> {
        deserialize_record(data, PROGRAM_STATE_DISCRIMINATOR)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CommerceError> {
        serialize_record(self, PROGRAM_STATE_DISCRIMINATOR, Self::SERIALIZED_SIZE)
    }
}

/// Per-identity user record.
///
/// Record data layout:
///
/// | offset | size    | field          |
/// | ------ | ------- | -------------- |
/// | 0      | 1       | discriminator  |
/// | 1      | 32      | owner          |
/// | 33     | 1       | is_initialized |
/// | 34     | 4       | exp_points     |
/// | 38     | 1 or 33 | referrer       |
/// | 39/71  | 1       | is_merchant    |
///
/// A record with no referrer is 32 bytes shorter than
/// [`UserRecord::MAX_SERIALIZED_SIZE`].
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Identity this record belongs to.
    pub owner: Pubkey,
    /// True once the record has been created.
    pub is_initialized: bool,
    /// Accumulated experience points.
    pub exp_points: u32,
    /// Identity of the user who referred this one, if any. Immutable after
    /// registration.
    pub referrer: Option<Pubkey>,
    /// True once the user has registered a merchant.
    pub is_merchant: bool,
}

impl UserRecord {
    /// Derivation tag for user record addresses.
    pub const SEED: &'static [u8] = b"user";

    pub const MAX_SERIALIZED_SIZE: usize = 72;

    pub fn deserialize(data: &[u8]) -> Result<Self, CommerceError> {
        deserialize_record(data, USER_RECORD_DISCRIMINATOR)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CommerceError> {
        serialize_record(self, USER_RECORD_DISCRIMINATOR, Self::MAX_SERIALIZED_SIZE)
    }
}

/// Identifier of the compressed NFT that anchors a merchant's off-chain
/// listing.
#[derive(
    BorshDeserialize,
    BorshSerialize,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
pub struct NftIdentifier {
    /// Merkle tree holding the compressed NFT.
    pub merkle_tree: Pubkey,
    /// Leaf position of the NFT inside the tree.
    pub leaf_index: u32,
}

/// Per-merchant record, owned by the registering user's identity.
///
/// Record data layout:
///
/// | offset | size | field          |
/// | ------ | ---- | -------------- |
/// | 0      | 1    | discriminator  |
/// | 1      | 32   | owner          |
/// | 33     | 1    | is_initialized |
/// | 34     | 32   | merkle_tree    |
/// | 66     | 4    | leaf_index     |
/// | 70     | 4    | ratings length |
/// | 74     | n    | ratings        |
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct MerchantRecord {
    /// Identity of the user who registered this merchant.
    pub owner: Pubkey,
    /// True once the record has been created.
    pub is_initialized: bool,
    /// Compressed NFT backing the merchant listing. Immutable after
    /// registration.
    pub nft_identifier: NftIdentifier,
    /// Accepted ratings in submission order, each between 1 and 5. Append
    /// only.
    pub ratings: Vec<u8>,
}

impl MerchantRecord {
    /// Derivation tag for merchant record addresses.
    pub const SEED: &'static [u8] = b"merchant";

    /// Serialized size of a record with no ratings; each rating adds one
    /// byte.
    pub const BASE_SERIALIZED_SIZE: usize = 74;

    pub fn deserialize(data: &[u8]) -> Result<Self, CommerceError> {
        deserialize_record(data, MERCHANT_RECORD_DISCRIMINATOR)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CommerceError> {
        serialize_record(
            self,
            MERCHANT_RECORD_DISCRIMINATOR,
            Self::BASE_SERIALIZED_SIZE.saturating_add(self.ratings.len()),
        )
    }
}
