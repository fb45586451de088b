//! Bazaar Test Harness
//!
//! Provides a deterministic environment for integration-testing the Commerce
//! program:
//!
//! - An in-memory record store and token ledger
//! - A fully initialized program state with fresh service-wallet identities
//! - A DAO treasury token account for settlement fees
//! - Helpers that send real instructions through `process_instruction`
//!
//! The harness does NOT stub any program logic; every helper goes through the
//! same dispatch path production callers use, so signer checks, derivation,
//! and batch commits are all exercised.

use bazaar_commerce_program::derivation::derive_record_address;
use bazaar_commerce_program::state::{MerchantRecord, NftIdentifier, ProgramState, UserRecord};
use bazaar_commerce_program::{process_instruction, CommerceError, CommerceInstruction};
use bazaar_ledger::{InMemoryTokenLedger, RecordStore, SignerSet};
use solana_pubkey::Pubkey;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Default settlement fee used in tests (0.30%).
pub const DEFAULT_FEE_BPS: u16 = 30;

/// Default sender funding in settlement-mint base units (1000 USDC at six
/// decimals).
pub const DEFAULT_TOKEN_BALANCE: u64 = 1_000_000_000;

/// Leaf index used by the stock NFT identifier.
pub const DEFAULT_LEAF_INDEX: u32 = 123;

/// A fresh NFT identifier for merchant registration.
pub fn test_nft_identifier() -> NftIdentifier {
    NftIdentifier {
        merkle_tree: Pubkey::new_unique(),
        leaf_index: DEFAULT_LEAF_INDEX,
    }
}

// ─── Test harness ────────────────────────────────────────────────────────────

/// Top-level test harness holding one Commerce deployment.
///
/// Constructed via [`CommerceHarness::new`] for the default 30 bps fee, or
/// [`CommerceHarness::with_fee_bps`] for a custom rate.
/// [`CommerceHarness::uninitialized`] skips program state creation for tests
/// that exercise initialization itself.
pub struct CommerceHarness {
    /// Record store backing the deployment.
    pub store: RecordStore,
    /// Token ledger holding settlement balances.
    pub tokens: InMemoryTokenLedger,
    /// Address of the program state record.
    pub state_address: Pubkey,
    /// Identity that created the deployment.
    pub creator: Pubkey,
    /// DAO identity owning the treasury.
    pub dao: Pubkey,
    /// Onboarding service wallet.
    pub onboarding_wallet: Pubkey,
    /// Merchant-identity service wallet.
    pub merchant_id_wallet: Pubkey,
    /// Transaction service wallet.
    pub transaction_wallet: Pubkey,
    /// Review service wallet.
    pub review_wallet: Pubkey,
    /// Settlement mint.
    pub settlement_mint: Pubkey,
    /// DAO-owned token account that collects settlement fees.
    pub treasury_token_account: Pubkey,
}

impl Default for CommerceHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl CommerceHarness {
    /// Create a fully initialized deployment at the default fee rate.
    pub fn new() -> Self {
        Self::with_fee_bps(DEFAULT_FEE_BPS)
    }

    /// Create a fully initialized deployment at `fee_bps`.
    pub fn with_fee_bps(fee_bps: u16) -> Self {
        let mut harness = Self::uninitialized();
        harness
            .initialize(fee_bps)
            .expect("initialize program state");
        harness
            .tokens
            .create_account(
                harness.treasury_token_account,
                harness.settlement_mint,
                harness.dao,
            )
            .expect("create treasury token account");
        harness
    }

    /// Create a deployment with no program state record yet.
    pub fn uninitialized() -> Self {
        Self {
            store: RecordStore::new(),
            tokens: InMemoryTokenLedger::new(),
            state_address: Pubkey::new_unique(),
            creator: Pubkey::new_unique(),
            dao: Pubkey::new_unique(),
            onboarding_wallet: Pubkey::new_unique(),
            merchant_id_wallet: Pubkey::new_unique(),
            transaction_wallet: Pubkey::new_unique(),
            review_wallet: Pubkey::new_unique(),
            settlement_mint: Pubkey::new_unique(),
            treasury_token_account: Pubkey::new_unique(),
        }
    }

    // ─── Requests ────────────────────────────────────────────────────────────

    /// Run one instruction through the real dispatch path.
    pub fn process(
        &mut self,
        signers: &SignerSet,
        instruction: CommerceInstruction,
    ) -> Result<(), CommerceError> {
        process_instruction(&mut self.store, &mut self.tokens, signers, instruction)
    }

    /// Send `Initialize` signed by the creator.
    pub fn initialize(&mut self, fee_bps: u16) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::Initialize {
            state: self.state_address,
            creator: self.creator,
            dao: self.dao,
            onboarding_service_wallet: self.onboarding_wallet,
            merchant_id_service_wallet: self.merchant_id_wallet,
            transaction_service_wallet: self.transaction_wallet,
            review_service_wallet: self.review_wallet,
            settlement_mint: self.settlement_mint,
            transaction_fee_bps: fee_bps,
        };
        let creator = self.creator;
        self.process(&SignerSet::single(creator), instruction)
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    /// Register `user` with no referrer; panics on failure.
    pub fn register_user(&mut self, user: Pubkey) {
        self.try_register_user(user, None).expect("register user");
    }

    /// Register `user` naming `referrer`; panics on failure.
    pub fn register_user_with_referrer(&mut self, user: Pubkey, referrer: Pubkey) {
        self.try_register_user(user, Some(referrer))
            .expect("register user with referrer");
    }

    /// Send `InitializeUser` signed by the user alone.
    pub fn try_register_user(
        &mut self,
        user: Pubkey,
        referrer: Option<Pubkey>,
    ) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::InitializeUser {
            state: self.state_address,
            user,
            referrer,
            sponsor: None,
        };
        self.process(&SignerSet::single(user), instruction)
    }

    /// Send the read-only `CheckUserExists` request.
    pub fn check_user_exists(&mut self, user: Pubkey) -> Result<(), CommerceError> {
        self.process(
            &SignerSet::new(),
            CommerceInstruction::CheckUserExists { user },
        )
    }

    // ─── Merchants ───────────────────────────────────────────────────────────

    /// Register `user` as a merchant with a stock NFT identifier; panics on
    /// failure and returns the identifier that was stored.
    pub fn register_merchant(&mut self, user: Pubkey) -> NftIdentifier {
        let nft_identifier = test_nft_identifier();
        self.try_register_merchant(user, nft_identifier)
            .expect("register merchant");
        nft_identifier
    }

    /// Send `InitializeMerchant` signed by the user alone.
    pub fn try_register_merchant(
        &mut self,
        user: Pubkey,
        nft_identifier: NftIdentifier,
    ) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::InitializeMerchant {
            state: self.state_address,
            user,
            nft_identifier,
            sponsor: None,
        };
        self.process(&SignerSet::single(user), instruction)
    }

    /// Send `InitializeMerchantWithReferrer` signed by the user alone.
    pub fn try_register_merchant_with_referrer(
        &mut self,
        user: Pubkey,
        nft_identifier: NftIdentifier,
        referrer: Pubkey,
    ) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::InitializeMerchantWithReferrer {
            state: self.state_address,
            user,
            nft_identifier,
            referrer,
            sponsor: None,
        };
        self.process(&SignerSet::single(user), instruction)
    }

    /// Send `AwardMerchantExp` signed by the merchant-identity wallet.
    pub fn award_merchant_exp(&mut self, user: Pubkey) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::AwardMerchantExp {
            state: self.state_address,
            user,
        };
        let merchant_id_wallet = self.merchant_id_wallet;
        self.process(&SignerSet::single(merchant_id_wallet), instruction)
    }

    // ─── Ratings ─────────────────────────────────────────────────────────────

    /// Send `AddRating` signed by the review wallet.
    pub fn add_rating(
        &mut self,
        merchant: Pubkey,
        reviewer: Pubkey,
        rating: u8,
    ) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::AddRating {
            state: self.state_address,
            merchant,
            reviewer,
            rating,
        };
        let review_wallet = self.review_wallet;
        self.process(&SignerSet::single(review_wallet), instruction)
    }

    // ─── Records ─────────────────────────────────────────────────────────────

    /// Load the program state record.
    pub fn program_state(&self) -> ProgramState {
        let data = self
            .store
            .get(&self.state_address)
            .expect("program state exists");
        ProgramState::deserialize(data).expect("program state decodes")
    }

    /// Load the user record for `user`.
    pub fn user_record(&self, user: &Pubkey) -> UserRecord {
        let address = derive_record_address(UserRecord::SEED, user);
        let data = self.store.get(&address).expect("user record exists");
        UserRecord::deserialize(data).expect("user record decodes")
    }

    /// Load the merchant record registered by `user`.
    pub fn merchant_record(&self, user: &Pubkey) -> MerchantRecord {
        let address = derive_record_address(MerchantRecord::SEED, user);
        let data = self.store.get(&address).expect("merchant record exists");
        MerchantRecord::deserialize(data).expect("merchant record decodes")
    }

    /// Whether any record exists at the user address for `user`.
    pub fn has_user_record(&self, user: &Pubkey) -> bool {
        self.store
            .contains(&derive_record_address(UserRecord::SEED, user))
    }

    /// Whether any record exists at the merchant address for `user`.
    pub fn has_merchant_record(&self, user: &Pubkey) -> bool {
        self.store
            .contains(&derive_record_address(MerchantRecord::SEED, user))
    }

    // ─── Tokens ──────────────────────────────────────────────────────────────

    /// Create a settlement-mint token account for `owner` holding `amount`.
    pub fn create_token_account(&mut self, owner: Pubkey, amount: u64) -> Pubkey {
        let address = Pubkey::new_unique();
        self.tokens
            .create_account(address, self.settlement_mint, owner)
            .expect("create token account");
        if amount > 0 {
            self.tokens
                .mint_to(&address, amount)
                .expect("fund token account");
        }
        address
    }

    /// Balance of `address` in base units.
    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.tokens.balance(address).expect("token account exists")
    }

    /// Send `ExecuteTransaction` signed by the sender alone, routing the fee
    /// to the harness treasury.
    pub fn execute_transaction(
        &mut self,
        sender: Pubkey,
        sender_token_account: Pubkey,
        receiver_token_account: Pubkey,
        amount: u64,
    ) -> Result<(), CommerceError> {
        let instruction = CommerceInstruction::ExecuteTransaction {
            state: self.state_address,
            sender,
            sender_token_account,
            receiver_token_account,
            treasury_token_account: self.treasury_token_account,
            mint: self.settlement_mint,
            amount,
        };
        self.process(&SignerSet::single(sender), instruction)
    }
}
