//! Execution substrate for the Bazaar programs.
//!
//! This crate provides the small set of primitives a Bazaar program needs to
//! run against: a keyed record store with transaction-scoped write batches,
//! the set of identities that authorized a request, and a token ledger
//! interface for settlement balances. Programs stay pure state-transition
//! logic; everything environmental lives behind these types.
//!
//! # Quick start
//!
//! ```
//! use {
//!     bazaar_ledger::{RecordStore, SignerSet, WriteBatch},
//!     solana_pubkey::Pubkey,
//! };
//!
//! let mut store = RecordStore::new();
//! let address = Pubkey::new_unique();
//!
//! // Stage writes in a batch, then commit them as a unit.
//! let mut batch = WriteBatch::new();
//! batch.stage(address, vec![1, 2, 3]);
//! store.commit(batch);
//! assert_eq!(store.get(&address), Some(&[1, 2, 3][..]));
//!
//! // Signer sets carry the transport-verified identities of a request.
//! let authority = Pubkey::new_unique();
//! let signers = SignerSet::from([authority]);
//! assert!(signers.contains(&authority));
//! ```

pub mod signers;
pub mod store;
pub mod token;

pub use {
    signers::SignerSet,
    store::{RecordStore, WriteBatch},
    token::{InMemoryTokenLedger, TokenAccount, TokenLedger, TokenLedgerError},
};
