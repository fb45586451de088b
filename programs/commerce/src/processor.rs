//! Instruction processing for the Bazaar Commerce program.
//!
//! Every handler validates signers and preconditions first, stages its record
//! writes in a [`WriteBatch`], and only the dispatch layer commits the batch
//! once the handler has succeeded. A failed request therefore never leaves a
//! partial update behind.

use {
    crate::{
        constants::{
            INITIAL_USER_EXP, MAX_RATING, MAX_REQUEST_LEN, MAX_TRANSACTION_FEE_BPS,
            MERCHANT_REWARD_EXP, MIN_RATING, MIN_TRANSACTION_AMOUNT, RATING_REWARD_EXP,
            REFERRAL_BONUS_EXP, REFERRED_USER_INITIAL_EXP,
        },
        derivation::derive_record_address,
        error::CommerceError,
        fees::settlement_split,
        instruction::CommerceInstruction,
        state::{MerchantRecord, NftIdentifier, ProgramState, UserRecord},
    },
    bazaar_ledger::{RecordStore, SignerSet, TokenLedger, WriteBatch},
    bincode::Options,
    log::{debug, trace},
    solana_pubkey::Pubkey,
};

/// Decodes a serialized request and processes it.
///
/// Requests are fixed-int bincode and rejected past [`MAX_REQUEST_LEN`]
/// bytes, before any allocation proportional to the claimed length.
pub fn process_request<T: TokenLedger>(
    store: &mut RecordStore,
    token_ledger: &mut T,
    signers: &SignerSet,
    request_data: &[u8],
) -> Result<(), CommerceError> {
    let instruction = bincode::options()
        .with_limit(MAX_REQUEST_LEN)
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .deserialize(request_data)
        .map_err(|_| CommerceError::InvalidInstructionData)?;
    process_instruction(store, token_ledger, signers, instruction)
}

/// Processes one decoded instruction against the store and the token ledger.
///
/// Record writes are staged in a batch and committed only when the handler
/// returns `Ok`; on error the store is untouched.
pub fn process_instruction<T: TokenLedger>(
    store: &mut RecordStore,
    token_ledger: &mut T,
    signers: &SignerSet,
    instruction: CommerceInstruction,
) -> Result<(), CommerceError> {
    trace!("process_instruction: {instruction:?}");

    let mut batch = WriteBatch::new();
    let result = match instruction {
        CommerceInstruction::Initialize {
            state,
            creator,
            dao,
            onboarding_service_wallet,
            merchant_id_service_wallet,
            transaction_service_wallet,
            review_service_wallet,
            settlement_mint,
            transaction_fee_bps,
        } => {
            let record = ProgramState {
                owner: creator,
                dao,
                onboarding_service_wallet,
                merchant_id_service_wallet,
                transaction_service_wallet,
                review_service_wallet,
                settlement_mint,
                transaction_fee_bps,
                merchant_counter: 0,
            };
            process_initialize(store, &mut batch, signers, &state, record)
        }
        CommerceInstruction::InitializeUser {
            state,
            user,
            referrer,
            sponsor,
        } => process_initialize_user(store, &mut batch, signers, &state, &user, referrer, sponsor),
        CommerceInstruction::CheckUserExists { user } => process_check_user_exists(store, &user),
        CommerceInstruction::InitializeMerchant {
            state,
            user,
            nft_identifier,
            sponsor,
        } => process_initialize_merchant(
            store,
            &mut batch,
            signers,
            &state,
            &user,
            nft_identifier,
            None,
            sponsor,
        ),
        CommerceInstruction::InitializeMerchantWithReferrer {
            state,
            user,
            nft_identifier,
            referrer,
            sponsor,
        } => process_initialize_merchant(
            store,
            &mut batch,
            signers,
            &state,
            &user,
            nft_identifier,
            Some(referrer),
            sponsor,
        ),
        CommerceInstruction::AwardMerchantExp { state, user } => {
            process_award_merchant_exp(store, &mut batch, signers, &state, &user)
        }
        CommerceInstruction::AddRating {
            state,
            merchant,
            reviewer,
            rating,
        } => process_add_rating(store, &mut batch, signers, &state, &merchant, &reviewer, rating),
        CommerceInstruction::ExecuteTransaction {
            state,
            sender,
            sender_token_account,
            receiver_token_account,
            treasury_token_account,
            mint,
            amount,
        } => process_execute_transaction(
            store,
            token_ledger,
            signers,
            &state,
            &sender,
            &sender_token_account,
            &receiver_token_account,
            &treasury_token_account,
            &mint,
            amount,
        ),
    };

    if let Err(error) = result {
        debug!("request rejected: {error}");
        return Err(error);
    }
    store.commit(batch);
    Ok(())
}

// ---------------------------------------------------------------------------
// Signer checks
// ---------------------------------------------------------------------------

/// The named identity must have signed the request.
fn verify_signed(signers: &SignerSet, identity: &Pubkey) -> Result<(), CommerceError> {
    if !signers.contains(identity) {
        return Err(CommerceError::MissingRequiredSignature);
    }
    Ok(())
}

/// The configured service wallet must have signed the request.
fn verify_service_role(signers: &SignerSet, service_wallet: &Pubkey) -> Result<(), CommerceError> {
    if !signers.contains(service_wallet) {
        return Err(CommerceError::Unauthorized);
    }
    Ok(())
}

/// A sponsored request must name the configured service wallet as sponsor,
/// and the sponsor must have signed.
fn verify_sponsor(
    signers: &SignerSet,
    sponsor: Option<&Pubkey>,
    service_wallet: &Pubkey,
) -> Result<(), CommerceError> {
    let Some(sponsor) = sponsor else {
        return Ok(());
    };
    if sponsor != service_wallet {
        return Err(CommerceError::Unauthorized);
    }
    verify_signed(signers, sponsor)
}

// ---------------------------------------------------------------------------
// Record access
// ---------------------------------------------------------------------------

fn load_program_state(
    store: &RecordStore,
    address: &Pubkey,
) -> Result<ProgramState, CommerceError> {
    let Some(data) = store.get(address) else {
        return Err(CommerceError::StateNotInitialized);
    };
    ProgramState::deserialize(data)
}

fn load_user_record(
    store: &RecordStore,
    identity: &Pubkey,
) -> Result<(Pubkey, UserRecord), CommerceError> {
    let address = derive_record_address(UserRecord::SEED, identity);
    let Some(data) = store.get(&address) else {
        return Err(CommerceError::UserNotFound);
    };
    let record = UserRecord::deserialize(data)?;
    if !record.is_initialized {
        return Err(CommerceError::UserNotFound);
    }
    Ok((address, record))
}

fn load_merchant_record(
    store: &RecordStore,
    identity: &Pubkey,
) -> Result<(Pubkey, MerchantRecord), CommerceError> {
    let address = derive_record_address(MerchantRecord::SEED, identity);
    let Some(data) = store.get(&address) else {
        return Err(CommerceError::MerchantNotFound);
    };
    let record = MerchantRecord::deserialize(data)?;
    if !record.is_initialized {
        return Err(CommerceError::MerchantNotFound);
    }
    Ok((address, record))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Creates the singleton program state record.
///
/// Required signers:
///
/// 0. the deployment creator, recorded as `owner`
fn process_initialize(
    store: &RecordStore,
    batch: &mut WriteBatch,
    signers: &SignerSet,
    state_address: &Pubkey,
    state: ProgramState,
) -> Result<(), CommerceError> {
    verify_signed(signers, &state.owner)?;

    if state.transaction_fee_bps > MAX_TRANSACTION_FEE_BPS {
        return Err(CommerceError::InvalidFeeRate);
    }
    if store.contains(state_address) {
        return Err(CommerceError::AlreadyInitialized);
    }

    batch.stage(*state_address, state.to_bytes()?);

    debug!(
        "Initialize: state={state_address} owner={} dao={} fee_bps={}",
        state.owner, state.dao, state.transaction_fee_bps
    );
    Ok(())
}

/// Registers a user record, optionally crediting a referrer.
///
/// Required signers:
///
/// 0. the registering user
/// 1. the onboarding service wallet, when the request names a sponsor
fn process_initialize_user(
    store: &RecordStore,
    batch: &mut WriteBatch,
    signers: &SignerSet,
    state_address: &Pubkey,
    user: &Pubkey,
    referrer: Option<Pubkey>,
    sponsor: Option<Pubkey>,
) -> Result<(), CommerceError> {
    verify_signed(signers, user)?;
    if sponsor.is_some() {
        let state = load_program_state(store, state_address)?;
        verify_sponsor(signers, sponsor.as_ref(), &state.onboarding_service_wallet)?;
    }

    let user_address = derive_record_address(UserRecord::SEED, user);
    if store.contains(&user_address) {
        return Err(CommerceError::UserAlreadyExists);
    }

    // A referred user starts with the referral bonus on top of the base EXP,
    // and the referrer is credited in the same batch. Naming oneself fails
    // the existence check below because the record is only being created now.
    let mut exp_points = INITIAL_USER_EXP;
    if let Some(referrer_identity) = referrer {
        let (referrer_address, mut referrer_record) = load_user_record(store, &referrer_identity)
            .map_err(|_| CommerceError::ReferrerDoesNotExist)?;
        referrer_record.exp_points = referrer_record
            .exp_points
            .checked_add(REFERRAL_BONUS_EXP)
            .ok_or(CommerceError::ArithmeticOverflow)?;
        batch.stage(referrer_address, referrer_record.to_bytes()?);
        exp_points = REFERRED_USER_INITIAL_EXP;
    }

    let record = UserRecord {
        owner: *user,
        is_initialized: true,
        exp_points,
        referrer,
        is_merchant: false,
    };
    batch.stage(user_address, record.to_bytes()?);

    debug!("InitializeUser: user={user} exp_points={exp_points} referrer={referrer:?}");
    Ok(())
}

/// Verifies that an initialized user record exists for `user`.
///
/// Read only; requires no signers.
fn process_check_user_exists(store: &RecordStore, user: &Pubkey) -> Result<(), CommerceError> {
    let (_, record) = load_user_record(store, user)?;
    debug!("CheckUserExists: user={user} exp_points={}", record.exp_points);
    Ok(())
}

/// Registers a merchant record for `user` and increments the merchant
/// counter.
///
/// Required signers:
///
/// 0. the registering user
/// 1. the merchant-identity service wallet, when the request names a sponsor
///
/// When `required_referrer` is set, the user record must already name that
/// exact referrer and the referrer must itself be registered.
#[allow(clippy::too_many_arguments)]
fn process_initialize_merchant(
    store: &RecordStore,
    batch: &mut WriteBatch,
    signers: &SignerSet,
    state_address: &Pubkey,
    user: &Pubkey,
    nft_identifier: NftIdentifier,
    required_referrer: Option<Pubkey>,
    sponsor: Option<Pubkey>,
) -> Result<(), CommerceError> {
    verify_signed(signers, user)?;
    let mut state = load_program_state(store, state_address)?;
    verify_sponsor(signers, sponsor.as_ref(), &state.merchant_id_service_wallet)?;

    let (user_address, mut user_record) = load_user_record(store, user)?;

    if let Some(referrer_identity) = required_referrer {
        if user_record.referrer != Some(referrer_identity) {
            return Err(CommerceError::InvalidReferrer);
        }
        load_user_record(store, &referrer_identity)
            .map_err(|_| CommerceError::InvalidReferrer)?;
    }

    let merchant_address = derive_record_address(MerchantRecord::SEED, user);
    if store.contains(&merchant_address) {
        return Err(CommerceError::MerchantAlreadyExists);
    }

    state.merchant_counter = state
        .merchant_counter
        .checked_add(1)
        .ok_or(CommerceError::ArithmeticOverflow)?;
    user_record.is_merchant = true;

    let merchant_record = MerchantRecord {
        owner: *user,
        is_initialized: true,
        nft_identifier,
        ratings: Vec::new(),
    };

    batch.stage(merchant_address, merchant_record.to_bytes()?);
    batch.stage(user_address, user_record.to_bytes()?);
    batch.stage(*state_address, state.to_bytes()?);

    debug!(
        "InitializeMerchant: user={user} merchant={merchant_address} merchant_counter={}",
        state.merchant_counter
    );
    Ok(())
}

/// Credits `user` the merchant milestone EXP reward.
///
/// Required signers:
///
/// 0. the merchant-identity service wallet
fn process_award_merchant_exp(
    store: &RecordStore,
    batch: &mut WriteBatch,
    signers: &SignerSet,
    state_address: &Pubkey,
    user: &Pubkey,
) -> Result<(), CommerceError> {
    let state = load_program_state(store, state_address)?;
    verify_service_role(signers, &state.merchant_id_service_wallet)?;

    let (user_address, mut user_record) = load_user_record(store, user)?;
    user_record.exp_points = user_record
        .exp_points
        .checked_add(MERCHANT_REWARD_EXP)
        .ok_or(CommerceError::ArithmeticOverflow)?;
    batch.stage(user_address, user_record.to_bytes()?);

    debug!(
        "AwardMerchantExp: user={user} exp_points={}",
        user_record.exp_points
    );
    Ok(())
}

/// Appends a rating to a merchant record and rewards the reviewer.
///
/// Required signers:
///
/// 0. the review service wallet
///
/// The rating bounds are checked before authorization so malformed requests
/// fail the same way no matter who signed them.
fn process_add_rating(
    store: &RecordStore,
    batch: &mut WriteBatch,
    signers: &SignerSet,
    state_address: &Pubkey,
    merchant: &Pubkey,
    reviewer: &Pubkey,
    rating: u8,
) -> Result<(), CommerceError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CommerceError::InvalidRating);
    }
    let state = load_program_state(store, state_address)?;
    verify_service_role(signers, &state.review_service_wallet)?;

    let (merchant_address, mut merchant_record) = load_merchant_record(store, merchant)?;
    let (reviewer_address, mut reviewer_record) = load_user_record(store, reviewer)?;

    merchant_record.ratings.push(rating);
    reviewer_record.exp_points = reviewer_record
        .exp_points
        .checked_add(RATING_REWARD_EXP)
        .ok_or(CommerceError::ArithmeticOverflow)?;

    batch.stage(merchant_address, merchant_record.to_bytes()?);
    batch.stage(reviewer_address, reviewer_record.to_bytes()?);

    debug!(
        "AddRating: merchant={merchant} rating={rating} reviewer={reviewer} ratings_total={}",
        merchant_record.ratings.len()
    );
    Ok(())
}

/// Settles `amount` from the sender to the receiver, routing the configured
/// fee to the DAO treasury.
///
/// Required signers:
///
/// 0. the sender, who must own the debited token account
///
/// Every balance movement is validated up front, so once the first transfer
/// applies the second cannot fail.
#[allow(clippy::too_many_arguments)]
fn process_execute_transaction<T: TokenLedger>(
    store: &RecordStore,
    token_ledger: &mut T,
    signers: &SignerSet,
    state_address: &Pubkey,
    sender: &Pubkey,
    sender_token_account: &Pubkey,
    receiver_token_account: &Pubkey,
    treasury_token_account: &Pubkey,
    mint: &Pubkey,
    amount: u64,
) -> Result<(), CommerceError> {
    verify_signed(signers, sender)?;
    if amount < MIN_TRANSACTION_AMOUNT {
        return Err(CommerceError::AmountTooLow);
    }

    let state = load_program_state(store, state_address)?;
    if *mint != state.settlement_mint {
        return Err(CommerceError::MintMismatch);
    }

    let sender_account = token_ledger.token_account(sender_token_account)?;
    let receiver_account = token_ledger.token_account(receiver_token_account)?;
    let treasury_account = token_ledger.token_account(treasury_token_account)?;

    if sender_account.owner != *sender {
        return Err(CommerceError::Unauthorized);
    }
    if sender_account.mint != *mint
        || receiver_account.mint != *mint
        || treasury_account.mint != *mint
    {
        return Err(CommerceError::MintMismatch);
    }
    if treasury_account.owner != state.dao {
        return Err(CommerceError::TreasuryMismatch);
    }
    if sender_account.amount < amount {
        return Err(CommerceError::InsufficientFunds);
    }

    let (transfer_amount, fee) = settlement_split(amount, state.transaction_fee_bps)?;

    // Pre-validate both credits; the receiver and the treasury may be the
    // same account, in which case it absorbs the whole amount.
    let receiver_credit = if receiver_token_account == treasury_token_account {
        amount
    } else {
        transfer_amount
    };
    receiver_account
        .amount
        .checked_add(receiver_credit)
        .ok_or(CommerceError::ArithmeticOverflow)?;
    treasury_account
        .amount
        .checked_add(fee)
        .ok_or(CommerceError::ArithmeticOverflow)?;

    token_ledger.transfer(sender_token_account, receiver_token_account, transfer_amount)?;
    token_ledger.transfer(sender_token_account, treasury_token_account, fee)?;

    debug!(
        "ExecuteTransaction: sender={sender} amount={amount} transfer={transfer_amount} fee={fee}"
    );
    Ok(())
}
