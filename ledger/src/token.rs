//! Token ledger interface for settlement balances.
//!
//! Programs settle value by moving base units between token accounts. The
//! [`TokenLedger`] trait is the seam between program logic and whatever
//! actually holds the balances; [`InMemoryTokenLedger`] is the stock
//! implementation used by tests and single-process deployments.

use {solana_pubkey::Pubkey, std::collections::HashMap, thiserror::Error};

/// Reasons a token ledger operation can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenLedgerError {
    #[error("No token account exists at {0}")]
    UnknownAccount(Pubkey),

    #[error("A token account already exists at {0}")]
    AccountExists(Pubkey),

    #[error("Source and destination accounts hold different mints")]
    MintMismatch,

    #[error("Insufficient funds: balance {balance}, needed {needed}")]
    InsufficientFunds { balance: u64, needed: u64 },

    #[error("Crediting {0} would overflow its balance")]
    BalanceOverflow(Pubkey),
}

/// A token account: a balance of one mint, controlled by one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccount {
    /// Mint whose base units this account holds.
    pub mint: Pubkey,
    /// Identity allowed to spend from this account.
    pub owner: Pubkey,
    /// Balance in base units.
    pub amount: u64,
}

/// Balance storage seam for settlement.
pub trait TokenLedger {
    /// Returns the token account at `address`.
    fn token_account(&self, address: &Pubkey) -> Result<TokenAccount, TokenLedgerError>;

    /// Moves `amount` base units from `from` to `to`.
    ///
    /// Atomic: on error, neither balance changes. Both accounts must hold the
    /// same mint.
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64)
        -> Result<(), TokenLedgerError>;
}

/// Process-local token ledger.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    accounts: HashMap<Pubkey, TokenAccount>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty token account for `owner` holding `mint`.
    pub fn create_account(
        &mut self,
        address: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
    ) -> Result<(), TokenLedgerError> {
        if self.accounts.contains_key(&address) {
            return Err(TokenLedgerError::AccountExists(address));
        }
        self.accounts.insert(
            address,
            TokenAccount {
                mint,
                owner,
                amount: 0,
            },
        );
        Ok(())
    }

    /// Credits `amount` freshly issued base units to `address`.
    pub fn mint_to(&mut self, address: &Pubkey, amount: u64) -> Result<(), TokenLedgerError> {
        let Some(account) = self.accounts.get_mut(address) else {
            return Err(TokenLedgerError::UnknownAccount(*address));
        };
        account.amount = account
            .amount
            .checked_add(amount)
            .ok_or(TokenLedgerError::BalanceOverflow(*address))?;
        Ok(())
    }

    /// Returns the balance at `address` in base units.
    pub fn balance(&self, address: &Pubkey) -> Result<u64, TokenLedgerError> {
        self.token_account(address).map(|account| account.amount)
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn token_account(&self, address: &Pubkey) -> Result<TokenAccount, TokenLedgerError> {
        self.accounts
            .get(address)
            .copied()
            .ok_or(TokenLedgerError::UnknownAccount(*address))
    }

    fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), TokenLedgerError> {
        let source = self.token_account(from)?;
        let destination = self.token_account(to)?;

        if source.mint != destination.mint {
            return Err(TokenLedgerError::MintMismatch);
        }
        let debited =
            source
                .amount
                .checked_sub(amount)
                .ok_or(TokenLedgerError::InsufficientFunds {
                    balance: source.amount,
                    needed: amount,
                })?;
        if from == to {
            // A self-transfer leaves the balance unchanged once funds are
            // verified.
            return Ok(());
        }
        let credited = destination
            .amount
            .checked_add(amount)
            .ok_or(TokenLedgerError::BalanceOverflow(*to))?;

        let Some(account) = self.accounts.get_mut(from) else {
            return Err(TokenLedgerError::UnknownAccount(*from));
        };
        account.amount = debited;
        let Some(account) = self.accounts.get_mut(to) else {
            return Err(TokenLedgerError::UnknownAccount(*to));
        };
        account.amount = credited;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_pair(ledger: &mut InMemoryTokenLedger, mint: Pubkey, amount: u64) -> (Pubkey, Pubkey) {
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        ledger
            .create_account(source, mint, Pubkey::new_unique())
            .unwrap();
        ledger
            .create_account(destination, mint, Pubkey::new_unique())
            .unwrap();
        ledger.mint_to(&source, amount).unwrap();
        (source, destination)
    }

    #[test]
    fn test_transfer_moves_base_units() {
        let mut ledger = InMemoryTokenLedger::new();
        let mint = Pubkey::new_unique();
        let (source, destination) = funded_pair(&mut ledger, mint, 1_000);

        ledger.transfer(&source, &destination, 400).unwrap();

        assert_eq!(ledger.balance(&source).unwrap(), 600);
        assert_eq!(ledger.balance(&destination).unwrap(), 400);
    }

    #[test]
    fn test_transfer_insufficient_funds_changes_nothing() {
        let mut ledger = InMemoryTokenLedger::new();
        let mint = Pubkey::new_unique();
        let (source, destination) = funded_pair(&mut ledger, mint, 100);

        let err = ledger.transfer(&source, &destination, 101).unwrap_err();
        assert_eq!(
            err,
            TokenLedgerError::InsufficientFunds {
                balance: 100,
                needed: 101,
            }
        );
        assert_eq!(ledger.balance(&source).unwrap(), 100);
        assert_eq!(ledger.balance(&destination).unwrap(), 0);
    }

    #[test]
    fn test_transfer_rejects_mint_mismatch() {
        let mut ledger = InMemoryTokenLedger::new();
        let (source, _) = funded_pair(&mut ledger, Pubkey::new_unique(), 100);
        let other = Pubkey::new_unique();
        ledger
            .create_account(other, Pubkey::new_unique(), Pubkey::new_unique())
            .unwrap();

        assert_eq!(
            ledger.transfer(&source, &other, 1),
            Err(TokenLedgerError::MintMismatch)
        );
    }

    #[test]
    fn test_transfer_rejects_unknown_accounts() {
        let mut ledger = InMemoryTokenLedger::new();
        let mint = Pubkey::new_unique();
        let (source, _) = funded_pair(&mut ledger, mint, 100);
        let missing = Pubkey::new_unique();

        assert_eq!(
            ledger.transfer(&source, &missing, 1),
            Err(TokenLedgerError::UnknownAccount(missing))
        );
        assert_eq!(
            ledger.transfer(&missing, &source, 1),
            Err(TokenLedgerError::UnknownAccount(missing))
        );
    }

    #[test]
    fn test_transfer_rejects_destination_overflow() {
        let mut ledger = InMemoryTokenLedger::new();
        let mint = Pubkey::new_unique();
        let (source, destination) = funded_pair(&mut ledger, mint, 10);
        ledger.mint_to(&destination, u64::MAX).unwrap();

        assert_eq!(
            ledger.transfer(&source, &destination, 1),
            Err(TokenLedgerError::BalanceOverflow(destination))
        );
        assert_eq!(ledger.balance(&source).unwrap(), 10);
        assert_eq!(ledger.balance(&destination).unwrap(), u64::MAX);
    }

    #[test]
    fn test_self_transfer_is_a_validated_no_op() {
        let mut ledger = InMemoryTokenLedger::new();
        let mint = Pubkey::new_unique();
        let (source, _) = funded_pair(&mut ledger, mint, 50);

        ledger.transfer(&source, &source, 50).unwrap();
        assert_eq!(ledger.balance(&source).unwrap(), 50);

        assert_eq!(
            ledger.transfer(&source, &source, 51),
            Err(TokenLedgerError::InsufficientFunds {
                balance: 50,
                needed: 51,
            })
        );
    }

    #[test]
    fn test_create_account_rejects_existing_address() {
        let mut ledger = InMemoryTokenLedger::new();
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let address = Pubkey::new_unique();

        ledger.create_account(address, mint, owner).unwrap();
        assert_eq!(
            ledger.create_account(address, mint, owner),
            Err(TokenLedgerError::AccountExists(address))
        );
    }

    #[test]
    fn test_mint_to_rejects_balance_overflow() {
        let mut ledger = InMemoryTokenLedger::new();
        let address = Pubkey::new_unique();
        ledger
            .create_account(address, Pubkey::new_unique(), Pubkey::new_unique())
            .unwrap();
        ledger.mint_to(&address, u64::MAX).unwrap();

        assert_eq!(
            ledger.mint_to(&address, 1),
            Err(TokenLedgerError::BalanceOverflow(address))
        );
        assert_eq!(ledger.balance(&address).unwrap(), u64::MAX);
    }
}
