use crate::ContractError;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Policy switches for behaviors carried over from the legacy ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Require the transfer caller to be the batch's current owner.
    pub enforce_current_owner: bool,
    /// Allow placeholder batches for ids that predate the ledger.
    pub legacy_adoption: bool,
    /// Create provisional identities for unknown registrants and transfer parties.
    pub auto_provision: bool,
}

impl LedgerConfig {
    pub fn default_policy() -> Self {
        LedgerConfig {
            enforce_current_owner: false,
            legacy_adoption: false,
            auto_provision: true,
        }
    }
}

fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn initialize(env: &Env, admin: &Address) -> Result<(), ContractError> {
    if is_initialized(env) {
        return Err(ContractError::AlreadyInitialized);
    }

    env.storage().instance().set(&ADMIN, admin);
    env.storage().instance().set(&INITIALIZED, &true);
    env.storage()
        .instance()
        .set(&CONFIG, &LedgerConfig::default_policy());
    extend_ttl_instance(env);

    Ok(())
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(ContractError::NotInitialized)
}

/// Fails unless the contract has an administrator.
pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    get_admin(env).map(|_| ())
}

pub fn is_admin(env: &Env, caller: &Address) -> bool {
    matches!(get_admin(env), Ok(admin) if admin == *caller)
}

pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    let admin = get_admin(env)?;
    if admin != *caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn get_config(env: &Env) -> LedgerConfig {
    env.storage()
        .instance()
        .get(&CONFIG)
        .unwrap_or_else(LedgerConfig::default_policy)
}

pub fn set_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&CONFIG, config);
    extend_ttl_instance(env);
}
