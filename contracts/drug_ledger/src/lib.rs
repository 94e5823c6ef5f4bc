#![no_std]

pub mod config;
pub mod custody;
pub mod errors;
pub mod events;
pub mod registry;
pub mod roles;
pub mod validation;
pub mod verifier;

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String, Vec};

pub use config::LedgerConfig;
pub use errors::{ContractError, ErrorCategory, ErrorInfo, ErrorSeverity};
pub use roles::Role;
pub use verifier::{AnomalyKind, AuditResult, BatchCheck, VerificationResult, MAX_SWEEP_PAGE};

/// Whether an identity was declared by its holder (or the admin) or inferred
/// by the ledger while registering or moving a batch.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum IdentityStatus {
    Confirmed = 0,
    Provisional = 1,
}

/// Registered supply-chain participant
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub address: Address,
    pub role: Role,
    pub name: String,
    pub registered: bool,
    pub status: IdentityStatus,
    pub registered_at: u64,
}

impl Identity {
    /// Zero value returned for addresses with no identity.
    pub fn unregistered(env: &Env, address: Address) -> Self {
        Identity {
            address,
            role: Role::None,
            name: String::from_str(env, ""),
            registered: false,
            status: IdentityStatus::Confirmed,
            registered_at: 0,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.status == IdentityStatus::Provisional
    }
}

/// Production lot tracked from manufacture through custody changes
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub batch_id: String,
    pub drug_name: String,
    pub manufacturer: Address,
    pub fingerprint: String,
    pub manufacture_time: u64,
    pub expiry_time: u64,
    pub current_owner: Address,
    pub registered: bool,
    /// Placeholder created for an id that predates the ledger
    pub legacy: bool,
    pub registered_at: u64,
}

/// One link in a batch's chain of custody. `from` is `None` for genesis.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustodyRecord {
    pub from: Option<Address>,
    pub to: Address,
    pub timestamp: u64,
    pub location: String,
    pub from_role: Role,
    pub to_role: Role,
}

/// Ledger totals, derived from stored collections
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerStats {
    pub total_batches: u32,
    pub total_identities: u32,
    pub total_transfers: u64,
}

#[contract]
pub struct DrugLedgerContract;

#[contractimpl]
impl DrugLedgerContract {
    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        config::initialize(&env, &admin)?;
        events::publish_initialized(&env, admin);
        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        config::get_admin(&env)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    pub fn get_config(env: Env) -> LedgerConfig {
        config::get_config(&env)
    }

    /// Replace the ledger policy. Admin only.
    pub fn set_config(
        env: Env,
        caller: Address,
        policy: LedgerConfig,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        config::require_admin(&env, &caller)?;

        config::set_config(&env, &policy);
        events::publish_config_updated(&env, caller, policy);

        Ok(())
    }

    // ======================== Registry ========================

    /// Register an identity. `caller` must be `address` itself or the admin.
    pub fn register_identity(
        env: Env,
        caller: Address,
        address: Address,
        role: Role,
        name: String,
    ) -> Result<Identity, ContractError> {
        caller.require_auth();
        config::require_initialized(&env)?;
        registry::register_identity(&env, &caller, &address, role, &name)
    }

    /// Promote a provisional identity to confirmed. Admin only; the role is kept.
    pub fn confirm_identity(
        env: Env,
        caller: Address,
        address: Address,
        name: String,
    ) -> Result<Identity, ContractError> {
        caller.require_auth();
        config::require_initialized(&env)?;
        registry::confirm_identity(&env, &caller, &address, &name)
    }

    /// Identity for `address`, or an unregistered zero value.
    pub fn get_identity(env: Env, address: Address) -> Identity {
        registry::get_identity(&env, &address)
            .unwrap_or_else(|| Identity::unregistered(&env, address))
    }

    /// Register a new batch owned by the calling manufacturer.
    pub fn register_batch(
        env: Env,
        caller: Address,
        batch_id: String,
        drug_name: String,
        fingerprint: String,
        manufacture_time: u64,
        expiry_time: u64,
    ) -> Result<Batch, ContractError> {
        caller.require_auth();
        config::require_initialized(&env)?;
        registry::register_batch(
            &env,
            &caller,
            &batch_id,
            &drug_name,
            &fingerprint,
            manufacture_time,
            expiry_time,
        )
    }

    /// Create a placeholder batch for an id that predates the ledger.
    /// Only available while legacy adoption is enabled.
    pub fn adopt_legacy_batch(
        env: Env,
        caller: Address,
        batch_id: String,
    ) -> Result<Batch, ContractError> {
        caller.require_auth();
        config::require_initialized(&env)?;
        registry::adopt_legacy_batch(&env, &caller, &batch_id)
    }

    pub fn get_batch(env: Env, batch_id: String) -> Result<Batch, ContractError> {
        registry::require_batch(&env, &batch_id)
    }

    pub fn batch_exists(env: Env, batch_id: String) -> bool {
        registry::batch_exists(&env, &batch_id)
    }

    /// Batch ids created by `manufacturer`, oldest first.
    pub fn get_manufacturer_batches(env: Env, manufacturer: Address) -> Vec<String> {
        registry::manufacturer_batches(&env, &manufacturer)
    }

    pub fn get_statistics(env: Env) -> LedgerStats {
        registry::statistics(&env)
    }

    // ======================== Custody ========================

    /// Hand custody of a batch to `new_owner` and append the custody record.
    pub fn transfer_custody(
        env: Env,
        caller: Address,
        batch_id: String,
        new_owner: Address,
        location: String,
    ) -> Result<CustodyRecord, ContractError> {
        caller.require_auth();
        config::require_initialized(&env)?;
        custody::transfer_custody(&env, &caller, &batch_id, &new_owner, &location)
    }

    /// Full chain of custody, genesis first.
    pub fn get_history(env: Env, batch_id: String) -> Result<Vec<CustodyRecord>, ContractError> {
        registry::require_batch(&env, &batch_id)?;
        Ok(registry::get_history(&env, &batch_id))
    }

    pub fn get_record_at(
        env: Env,
        batch_id: String,
        index: u32,
    ) -> Result<CustodyRecord, ContractError> {
        verifier::get_record_at(&env, &batch_id, index)
    }

    // ======================== Verification ========================

    /// Public authenticity check: unexpired with a non-empty custody chain.
    pub fn verify_batch(env: Env, batch_id: String) -> Result<VerificationResult, ContractError> {
        verifier::verify(&env, &batch_id)
    }

    pub fn verify_batches(env: Env, batch_ids: Vec<String>) -> Vec<BatchCheck> {
        verifier::verify_batches(&env, &batch_ids)
    }

    /// Check a recomputed composition digest against the registered one.
    pub fn verify_fingerprint(
        env: Env,
        batch_id: String,
        fingerprint: String,
    ) -> Result<bool, ContractError> {
        verifier::verify_fingerprint(&env, &batch_id, &fingerprint)
    }

    /// Regulator-only anomaly check for a single batch.
    pub fn audit_batch(
        env: Env,
        caller: Address,
        batch_id: String,
    ) -> Result<AuditResult, ContractError> {
        caller.require_auth();
        verifier::audit(&env, &caller, &batch_id)
    }

    /// Audits the batches at registration positions `start..start + limit`
    /// and returns those with an anomaly. `limit` is capped at `MAX_SWEEP_PAGE`.
    pub fn list_anomalous_batches(
        env: Env,
        caller: Address,
        start: u32,
        limit: u32,
    ) -> Result<Vec<AuditResult>, ContractError> {
        caller.require_auth();
        verifier::list_anomalous(&env, &caller, start, limit)
    }

    pub fn list_expired_batches(
        env: Env,
        caller: Address,
        start: u32,
        limit: u32,
    ) -> Result<Vec<String>, ContractError> {
        caller.require_auth();
        verifier::list_expired(&env, &caller, start, limit)
    }

    /// Category, severity and message for an error code.
    pub fn describe_error(env: Env, code: u32) -> Option<ErrorInfo> {
        ContractError::from_code(code).map(|error| errors::error_info(&env, error))
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

#[cfg(test)]
mod test;
