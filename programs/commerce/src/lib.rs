//! Bazaar Commerce program.
//!
//! A deterministic state-transition core for a payments-and-merchants
//! ledger: users register once per identity, merchants hang off users,
//! ratings accrue on merchant records, and settlement moves settlement-mint
//! base units with a basis-point fee routed to the DAO treasury.
//!
//! Records live in a [`bazaar_ledger::RecordStore`] at addresses derived
//! from `(tag, identity)`, so an identity has at most one user record and at
//! most one merchant record. Handlers stage every write in a
//! [`bazaar_ledger::WriteBatch`]; the batch commits only when the whole
//! request succeeds.
//!
//! # EXP schedule
//!
//! | event                          | EXP  |
//! | ------------------------------ | ---- |
//! | user registration              | 100  |
//! | user registration via referral | 150  |
//! | referring a new user           | +50  |
//! | accepted rating, to reviewer   | +20  |
//! | merchant milestone award       | +100 |
//!
//! # Settlement
//!
//! `fee = floor(amount * fee_bps / 10_000)`, truncating toward zero. The
//! receiver is credited the amount minus the fee and the DAO treasury the
//! fee, atomically with the sender's debit.

#![allow(clippy::arithmetic_side_effects)]

pub mod constants;
pub mod derivation;
pub mod error;
pub mod fees;
pub mod instruction;
pub mod processor;
pub mod state;

pub use {
    error::CommerceError,
    instruction::CommerceInstruction,
    processor::{process_instruction, process_request},
};
