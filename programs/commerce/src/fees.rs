//! Settlement fee math.

use crate::{constants::BPS_DENOMINATOR, error::CommerceError};

/// Computes the fee on `amount` at `fee_bps` basis points.
///
/// The fee truncates toward zero; amounts too small for the rate to bite pay
/// no fee at all. Intermediate math runs in u128 so no in-range input can
/// overflow.
pub fn settlement_fee(amount: u64, fee_bps: u16) -> Result<u64, CommerceError> {
    let fee = u128::from(amount)
        .checked_mul(u128::from(fee_bps))
        .ok_or(CommerceError::ArithmeticOverflow)?
        .checked_div(u128::from(BPS_DENOMINATOR))
        .ok_or(CommerceError::ArithmeticOverflow)?;
    u64::try_from(fee).map_err(|_| CommerceError::ArithmeticOverflow)
}

/// Splits `amount` into `(transfer, fee)` at `fee_bps` basis points.
///
/// The two parts always sum back to `amount`: the receiver is credited
/// `transfer` and the treasury `fee`.
pub fn settlement_split(amount: u64, fee_bps: u16) -> Result<(u64, u64), CommerceError> {
    let fee = settlement_fee(amount, fee_bps)?;
    let transfer = amount
        .checked_sub(fee)
        .ok_or(CommerceError::ArithmeticOverflow)?;
    Ok((transfer, fee))
}
