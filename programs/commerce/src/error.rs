//! Error types for the Bazaar Commerce program.

use {
    bazaar_ledger::TokenLedgerError,
    num_derive::{FromPrimitive, ToPrimitive},
    thiserror::Error,
};

/// Errors that may be returned by the Commerce program.
///
/// The first ten variants are the validation taxonomy clients match on; their
/// numeric codes are stable. Variants after `InsufficientFunds` cover
/// transport and environment failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum CommerceError {
    #[error("Program state already initialized")]
    AlreadyInitialized = 0,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Referrer does not exist")]
    ReferrerDoesNotExist,

    #[error("Referrer does not match the one named at registration")]
    InvalidReferrer,

    #[error("Merchant already exists")]
    MerchantAlreadyExists,

    #[error("Rating is outside the accepted 1 to 5 range")]
    InvalidRating,

    #[error("Signer is not authorized for this operation")]
    Unauthorized,

    #[error("Transaction amount is below the minimum")]
    AmountTooLow,

    #[error("Insufficient funds for transaction")]
    InsufficientFunds,

    #[error("Required signature is missing")]
    MissingRequiredSignature,

    #[error("Program state has not been initialized")]
    StateNotInitialized,

    #[error("Merchant does not exist")]
    MerchantNotFound,

    #[error("Transaction fee exceeds 10000 basis points")]
    InvalidFeeRate,

    #[error("Token account holds the wrong mint")]
    MintMismatch,

    #[error("Treasury token account is not owned by the DAO")]
    TreasuryMismatch,

    #[error("Token account does not exist")]
    TokenAccountNotFound,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Request data could not be decoded")]
    InvalidInstructionData,

    #[error("Record data could not be decoded")]
    InvalidAccountData,
}

impl CommerceError {
    /// Stable numeric code reported to clients.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<TokenLedgerError> for CommerceError {
    fn from(error: TokenLedgerError) -> Self {
        match error {
            TokenLedgerError::UnknownAccount(_) => Self::TokenAccountNotFound,
            TokenLedgerError::AccountExists(_) => Self::InvalidAccountData,
            TokenLedgerError::MintMismatch => Self::MintMismatch,
            TokenLedgerError::InsufficientFunds { .. } => Self::InsufficientFunds,
            TokenLedgerError::BalanceOverflow(_) => Self::ArithmeticOverflow,
        }
    }
}
