use crate::config;
use crate::events;
use crate::roles::{self, Role, PROVISIONAL_REGISTRANT_ROLE};
use crate::validation;
use crate::{Batch, ContractError, CustodyRecord, Identity, IdentityStatus, LedgerStats};
use soroban_sdk::{symbol_short, Address, Env, String, Symbol, Vec};

const IDENTITY: Symbol = symbol_short!("IDENT");
const IDENTITY_INDEX: Symbol = symbol_short!("ID_IDX");
const BATCH: Symbol = symbol_short!("BATCH");
const HISTORY: Symbol = symbol_short!("HISTORY");
const BATCH_INDEX: Symbol = symbol_short!("BAT_IDX");
const MANUFACTURER_BATCHES: Symbol = symbol_short!("MFR_BAT");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

pub const GENESIS_LOCATION: &str = "Manufacturing Facility";
pub const LEGACY_LOCATION: &str = "System Creation (Data Migration)";
pub const LEGACY_DRUG_NAME: &str = "Unknown";
/// Shelf life granted to placeholder batches, in seconds.
pub const LEGACY_SHELF_LIFE: u64 = 365 * 24 * 60 * 60;

fn extend_ttl_address_key(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_batch_key(env: &Env, key: &(Symbol, String)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_index(env: &Env, key: &Symbol) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Identities ───────────────────────────────────────────────

pub fn get_identity(env: &Env, address: &Address) -> Option<Identity> {
    env.storage()
        .persistent()
        .get(&(IDENTITY, address.clone()))
}

/// Role held by `address`, or `Role::None` when it has no identity.
pub fn role_of(env: &Env, address: &Address) -> Role {
    get_identity(env, address)
        .map(|identity| identity.role)
        .unwrap_or(Role::None)
}

fn store_identity(env: &Env, identity: &Identity) {
    let key = (IDENTITY, identity.address.clone());
    env.storage().persistent().set(&key, identity);
    extend_ttl_address_key(env, &key);
}

fn insert_identity(env: &Env, identity: &Identity) {
    store_identity(env, identity);

    let mut index: Vec<Address> = env
        .storage()
        .persistent()
        .get(&IDENTITY_INDEX)
        .unwrap_or(Vec::new(env));
    index.push_back(identity.address.clone());
    env.storage().persistent().set(&IDENTITY_INDEX, &index);
    extend_ttl_index(env, &IDENTITY_INDEX);

    events::publish_identity_registered(env, identity);
}

pub fn identity_count(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get::<_, Vec<Address>>(&IDENTITY_INDEX)
        .map(|index| index.len())
        .unwrap_or(0)
}

/// Registers a declared identity. Callers register themselves; the admin may
/// register on behalf of anyone.
pub fn register_identity(
    env: &Env,
    caller: &Address,
    address: &Address,
    role: Role,
    name: &String,
) -> Result<Identity, ContractError> {
    if caller != address && !config::is_admin(env, caller) {
        return Err(ContractError::Unauthorized);
    }

    if *address == env.current_contract_address() {
        return Err(ContractError::InvalidAddress);
    }
    if role == Role::None {
        return Err(ContractError::InvalidRole);
    }
    if get_identity(env, address).is_some() {
        return Err(ContractError::AlreadyRegistered);
    }
    validation::validate_name(name)?;

    let identity = Identity {
        address: address.clone(),
        role,
        name: name.clone(),
        registered: true,
        status: IdentityStatus::Confirmed,
        registered_at: env.ledger().timestamp(),
    };
    insert_identity(env, &identity);

    Ok(identity)
}

/// Creates an inferred identity with an empty name. The event and the stored
/// status both mark it provisional.
pub fn provision_identity(env: &Env, address: &Address, role: Role) -> Identity {
    let identity = Identity {
        address: address.clone(),
        role,
        name: String::from_str(env, ""),
        registered: true,
        status: IdentityStatus::Provisional,
        registered_at: env.ledger().timestamp(),
    };
    insert_identity(env, &identity);
    identity
}

/// Promotes a provisional identity to confirmed. The role never changes.
pub fn confirm_identity(
    env: &Env,
    caller: &Address,
    address: &Address,
    name: &String,
) -> Result<Identity, ContractError> {
    if !config::is_admin(env, caller) {
        return Err(ContractError::Unauthorized);
    }

    let mut identity = get_identity(env, address).ok_or(ContractError::IdentityNotFound)?;
    if !identity.is_provisional() {
        return Err(ContractError::IdentityNotProvisional);
    }
    validation::validate_name(name)?;

    identity.name = name.clone();
    identity.status = IdentityStatus::Confirmed;
    store_identity(env, &identity);
    events::publish_identity_confirmed(env, &identity);

    Ok(identity)
}

// ── Batches ──────────────────────────────────────────────────

pub fn get_batch(env: &Env, batch_id: &String) -> Option<Batch> {
    env.storage().persistent().get(&(BATCH, batch_id.clone()))
}

pub fn batch_exists(env: &Env, batch_id: &String) -> bool {
    env.storage().persistent().has(&(BATCH, batch_id.clone()))
}

pub fn require_batch(env: &Env, batch_id: &String) -> Result<Batch, ContractError> {
    get_batch(env, batch_id).ok_or(ContractError::BatchNotFound)
}

pub fn get_history(env: &Env, batch_id: &String) -> Vec<CustodyRecord> {
    env.storage()
        .persistent()
        .get(&(HISTORY, batch_id.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn batch_ids(env: &Env) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&BATCH_INDEX)
        .unwrap_or(Vec::new(env))
}

pub fn manufacturer_batches(env: &Env, manufacturer: &Address) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&(MANUFACTURER_BATCHES, manufacturer.clone()))
        .unwrap_or(Vec::new(env))
}

fn store_batch(env: &Env, batch: &Batch, history: &Vec<CustodyRecord>) {
    let batch_key = (BATCH, batch.batch_id.clone());
    env.storage().persistent().set(&batch_key, batch);
    extend_ttl_batch_key(env, &batch_key);

    let history_key = (HISTORY, batch.batch_id.clone());
    env.storage().persistent().set(&history_key, history);
    extend_ttl_batch_key(env, &history_key);
}

/// Stores a new batch with its genesis record and indexes it.
fn insert_batch(env: &Env, batch: &Batch, genesis: CustodyRecord) {
    let mut history = Vec::new(env);
    history.push_back(genesis);
    store_batch(env, batch, &history);

    let mut index = batch_ids(env);
    index.push_back(batch.batch_id.clone());
    env.storage().persistent().set(&BATCH_INDEX, &index);
    extend_ttl_index(env, &BATCH_INDEX);

    let mfr_key = (MANUFACTURER_BATCHES, batch.manufacturer.clone());
    let mut by_manufacturer = manufacturer_batches(env, &batch.manufacturer);
    by_manufacturer.push_back(batch.batch_id.clone());
    env.storage().persistent().set(&mfr_key, &by_manufacturer);
    extend_ttl_address_key(env, &mfr_key);
}

/// Moves the owner pointer and appends the matching record in one write set,
/// so the owner always equals the `to` of the last record.
pub fn record_custody_change(env: &Env, batch: &mut Batch, record: CustodyRecord) {
    let mut history = get_history(env, &batch.batch_id);
    batch.current_owner = record.to.clone();
    history.push_back(record);
    store_batch(env, batch, &history);
}

pub fn register_batch(
    env: &Env,
    caller: &Address,
    batch_id: &String,
    drug_name: &String,
    fingerprint: &String,
    manufacture_time: u64,
    expiry_time: u64,
) -> Result<Batch, ContractError> {
    validation::validate_batch_id(batch_id)?;
    if batch_exists(env, batch_id) {
        return Err(ContractError::BatchAlreadyExists);
    }
    validation::validate_drug_name(drug_name)?;
    validation::validate_fingerprint(fingerprint)?;

    let now = env.ledger().timestamp();
    validation::validate_dates(now, manufacture_time, expiry_time)?;

    let existing = get_identity(env, caller);
    let role = match &existing {
        Some(identity) => identity.role,
        None if config::get_config(env).auto_provision => PROVISIONAL_REGISTRANT_ROLE,
        None => Role::None,
    };
    if !roles::can_register_batch(role) {
        return Err(ContractError::Unauthorized);
    }

    if existing.is_none() {
        provision_identity(env, caller, role);
    }

    let batch = Batch {
        batch_id: batch_id.clone(),
        drug_name: drug_name.clone(),
        manufacturer: caller.clone(),
        fingerprint: fingerprint.clone(),
        manufacture_time,
        expiry_time,
        current_owner: caller.clone(),
        registered: true,
        legacy: false,
        registered_at: now,
    };
    let genesis = CustodyRecord {
        from: None,
        to: caller.clone(),
        timestamp: now,
        location: String::from_str(env, GENESIS_LOCATION),
        from_role: Role::None,
        to_role: Role::Manufacturer,
    };
    insert_batch(env, &batch, genesis);
    events::publish_batch_registered(env, &batch);

    Ok(batch)
}

/// Explicit entry point for ids that predate the ledger. Gated by config.
pub fn adopt_legacy_batch(
    env: &Env,
    caller: &Address,
    batch_id: &String,
) -> Result<Batch, ContractError> {
    validation::validate_batch_id(batch_id)?;
    if !config::get_config(env).legacy_adoption {
        return Err(ContractError::LegacyAdoptionDisabled);
    }
    if batch_exists(env, batch_id) {
        return Err(ContractError::BatchAlreadyExists);
    }
    Ok(adopt(env, caller, batch_id))
}

/// Creates the placeholder batch owned by `caller`. Callers check the gate.
pub(crate) fn adopt(env: &Env, caller: &Address, batch_id: &String) -> Batch {
    let now = env.ledger().timestamp();
    let batch = Batch {
        batch_id: batch_id.clone(),
        drug_name: String::from_str(env, LEGACY_DRUG_NAME),
        manufacturer: caller.clone(),
        fingerprint: String::from_str(env, ""),
        manufacture_time: now,
        expiry_time: now.saturating_add(LEGACY_SHELF_LIFE),
        current_owner: caller.clone(),
        registered: true,
        legacy: true,
        registered_at: now,
    };
    let genesis = CustodyRecord {
        from: None,
        to: caller.clone(),
        timestamp: now,
        location: String::from_str(env, LEGACY_LOCATION),
        from_role: Role::None,
        to_role: role_of(env, caller),
    };
    insert_batch(env, &batch, genesis);
    events::publish_legacy_adopted(env, &batch);

    batch
}

/// Totals derived from the stored collections rather than kept as counters.
pub fn statistics(env: &Env) -> LedgerStats {
    let ids = batch_ids(env);
    let mut total_transfers: u64 = 0;
    for batch_id in ids.iter() {
        total_transfers = total_transfers.saturating_add(get_history(env, &batch_id).len() as u64);
    }

    LedgerStats {
        total_batches: ids.len(),
        total_identities: identity_count(env),
        total_transfers,
    }
}
