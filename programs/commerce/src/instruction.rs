//! Instructions supported by the Bazaar Commerce program.

use {
    crate::state::NftIdentifier,
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

/// Instructions supported by the Commerce program.
///
/// Users and merchants are named by their wallet identity; the program
/// derives the backing record addresses itself. Signer requirements are
/// checked against the request's verified signer set before any record is
/// touched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum CommerceInstruction {
    /// Creates the singleton program state record.
    ///
    /// # Required signers
    ///
    /// - `creator`, recorded as the deployment owner
    ///
    /// Fails with `AlreadyInitialized` if `state` already holds a record,
    /// and with `InvalidFeeRate` if `transaction_fee_bps` exceeds 10_000.
    Initialize {
        /// Address the state record will live at.
        state: Pubkey,
        /// Identity creating the deployment.
        creator: Pubkey,
        /// DAO identity; settlement fees accrue to its treasury.
        dao: Pubkey,
        /// Service identity allowed to co-sign user registration.
        onboarding_service_wallet: Pubkey,
        /// Service identity allowed to co-sign merchant registration.
        merchant_id_service_wallet: Pubkey,
        /// Service identity allowed to co-sign settlement.
        transaction_service_wallet: Pubkey,
        /// Service identity that submits ratings.
        review_service_wallet: Pubkey,
        /// Mint settlements move base units of.
        settlement_mint: Pubkey,
        /// Settlement fee in basis points.
        transaction_fee_bps: u16,
    },

    /// Registers a user record for `user`, optionally crediting a referrer.
    ///
    /// # Required signers
    ///
    /// - `user`
    /// - `sponsor`, when present; must be the configured onboarding service
    ///   wallet
    ///
    /// A fresh user starts with 100 EXP, or 150 EXP when a valid `referrer`
    /// is named; the referrer is credited 50 EXP in the same request.
    InitializeUser {
        /// Address of the program state record, consulted only when
        /// `sponsor` is present.
        state: Pubkey,
        /// Identity registering.
        user: Pubkey,
        /// Identity of an already registered user who referred this one.
        referrer: Option<Pubkey>,
        /// Onboarding service wallet co-signing a sponsored deployment.
        sponsor: Option<Pubkey>,
    },

    /// Verifies that a user record exists for `user`.
    ///
    /// Read only; requires no signers. Fails with `UserNotFound` when the
    /// record is missing or uninitialized.
    CheckUserExists {
        /// Identity to look up.
        user: Pubkey,
    },

    /// Registers a merchant record for `user`.
    ///
    /// # Required signers
    ///
    /// - `user`, who must already have a user record
    /// - `sponsor`, when present; must be the configured merchant-identity
    ///   service wallet
    ///
    /// Marks the user record as a merchant and increments the global
    /// merchant counter.
    InitializeMerchant {
        /// Address of the program state record.
        state: Pubkey,
        /// Identity registering the merchant.
        user: Pubkey,
        /// Compressed NFT anchoring the merchant listing.
        nft_identifier: NftIdentifier,
        /// Merchant-identity service wallet co-signing a sponsored
        /// deployment.
        sponsor: Option<Pubkey>,
    },

    /// Registers a merchant record for `user`, crediting the referrer named
    /// at user registration.
    ///
    /// # Required signers
    ///
    /// Same as `InitializeMerchant`.
    ///
    /// Fails with `InvalidReferrer` unless `referrer` matches the referrer
    /// stored on the user record and that referrer is itself registered.
    InitializeMerchantWithReferrer {
        /// Address of the program state record.
        state: Pubkey,
        /// Identity registering the merchant.
        user: Pubkey,
        /// Compressed NFT anchoring the merchant listing.
        nft_identifier: NftIdentifier,
        /// Identity recorded as the user's referrer.
        referrer: Pubkey,
        /// Merchant-identity service wallet co-signing a sponsored
        /// deployment.
        sponsor: Option<Pubkey>,
    },

    /// Credits `user` the merchant milestone EXP reward.
    ///
    /// # Required signers
    ///
    /// - the configured merchant-identity service wallet
    AwardMerchantExp {
        /// Address of the program state record.
        state: Pubkey,
        /// Identity to credit.
        user: Pubkey,
    },

    /// Appends a rating to a merchant record and rewards the reviewer.
    ///
    /// # Required signers
    ///
    /// - the configured review service wallet
    ///
    /// `rating` must be between 1 and 5; the reviewer's user record is
    /// credited 20 EXP.
    AddRating {
        /// Address of the program state record.
        state: Pubkey,
        /// Identity whose merchant record receives the rating.
        merchant: Pubkey,
        /// Identity of the reviewing user.
        reviewer: Pubkey,
        /// Rating value between 1 and 5.
        rating: u8,
    },

    /// Settles `amount` base units from the sender to the receiver, routing
    /// the configured fee to the DAO treasury.
    ///
    /// # Required signers
    ///
    /// - `sender`, who must own `sender_token_account`
    ///
    /// The receiver is credited `amount` minus the fee; all three token
    /// accounts must hold the configured settlement mint and the treasury
    /// must be owned by the DAO. Either everything applies or nothing does.
    ExecuteTransaction {
        /// Address of the program state record.
        state: Pubkey,
        /// Identity paying.
        sender: Pubkey,
        /// Token account debited `amount`.
        sender_token_account: Pubkey,
        /// Token account credited `amount` minus the fee.
        receiver_token_account: Pubkey,
        /// DAO-owned token account credited the fee.
        treasury_token_account: Pubkey,
        /// Mint the caller intends to settle in.
        mint: Pubkey,
        /// Settlement amount in base units.
        amount: u64,
    },
}
