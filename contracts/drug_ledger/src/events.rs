use crate::{Batch, CustodyRecord, Identity, LedgerConfig, Role};
use soroban_sdk::{symbol_short, Address, Env, String};

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when the admin changes the ledger policy.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdatedEvent {
    pub admin: Address,
    pub config: LedgerConfig,
    pub timestamp: u64,
}

/// Event published when an identity is created, declared or inferred.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentityRegisteredEvent {
    pub address: Address,
    pub role: Role,
    pub name: String,
    pub provisional: bool,
    pub timestamp: u64,
}

/// Event published when a provisional identity is confirmed by the admin.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentityConfirmedEvent {
    pub address: Address,
    pub role: Role,
    pub name: String,
    pub timestamp: u64,
}

/// Event published when a manufacturer registers a batch.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchRegisteredEvent {
    pub batch_id: String,
    pub drug_name: String,
    pub manufacturer: Address,
    pub fingerprint: String,
    pub expiry_time: u64,
    pub timestamp: u64,
}

/// Event published when a placeholder batch is created for a legacy id.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LegacyBatchAdoptedEvent {
    pub batch_id: String,
    pub owner: Address,
    pub expiry_time: u64,
    pub timestamp: u64,
}

/// Event published for every custody change after genesis.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustodyTransferredEvent {
    pub batch_id: String,
    pub from: Address,
    pub to: Address,
    pub from_role: Role,
    pub to_role: Role,
    pub location: String,
    pub timestamp: u64,
}

/// Event published when a batch is verified.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchVerifiedEvent {
    pub batch_id: String,
    pub is_genuine: bool,
    pub transfer_count: u32,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_config_updated(env: &Env, admin: Address, config: LedgerConfig) {
    let topics = (symbol_short!("CFG_UPD"), admin.clone());
    let data = ConfigUpdatedEvent {
        admin,
        config,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when an identity is registered.
/// Provisional identities are flagged so audits can tell inferred roles from declared ones.
pub fn publish_identity_registered(env: &Env, identity: &Identity) {
    let topics = (symbol_short!("ID_REG"), identity.address.clone());
    let data = IdentityRegisteredEvent {
        address: identity.address.clone(),
        role: identity.role,
        name: identity.name.clone(),
        provisional: identity.is_provisional(),
        timestamp: identity.registered_at,
    };
    env.events().publish(topics, data);
}

pub fn publish_identity_confirmed(env: &Env, identity: &Identity) {
    let topics = (symbol_short!("ID_CONF"), identity.address.clone());
    let data = IdentityConfirmedEvent {
        address: identity.address.clone(),
        role: identity.role,
        name: identity.name.clone(),
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a batch is registered.
/// This event includes the batch id, drug name, manufacturer, fingerprint and expiry.
pub fn publish_batch_registered(env: &Env, batch: &Batch) {
    let topics = (symbol_short!("BAT_REG"), batch.manufacturer.clone());
    let data = BatchRegisteredEvent {
        batch_id: batch.batch_id.clone(),
        drug_name: batch.drug_name.clone(),
        manufacturer: batch.manufacturer.clone(),
        fingerprint: batch.fingerprint.clone(),
        expiry_time: batch.expiry_time,
        timestamp: batch.registered_at,
    };
    env.events().publish(topics, data);
}

pub fn publish_legacy_adopted(env: &Env, batch: &Batch) {
    let topics = (symbol_short!("LEGACY"), batch.current_owner.clone());
    let data = LegacyBatchAdoptedEvent {
        batch_id: batch.batch_id.clone(),
        owner: batch.current_owner.clone(),
        expiry_time: batch.expiry_time,
        timestamp: batch.registered_at,
    };
    env.events().publish(topics, data);
}

/// Publishes an event when custody of a batch changes hands.
/// Topics carry both parties so either side can index its own movements.
pub fn publish_custody_transferred(env: &Env, batch_id: String, record: &CustodyRecord, from: Address) {
    let topics = (symbol_short!("CUSTODY"), from.clone(), record.to.clone());
    let data = CustodyTransferredEvent {
        batch_id,
        from,
        to: record.to.clone(),
        from_role: record.from_role,
        to_role: record.to_role,
        location: record.location.clone(),
        timestamp: record.timestamp,
    };
    env.events().publish(topics, data);
}

pub fn publish_batch_verified(env: &Env, batch_id: String, is_genuine: bool, transfer_count: u32) {
    let topics = (symbol_short!("VERIFIED"),);
    let data = BatchVerifiedEvent {
        batch_id,
        is_genuine,
        transfer_count,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
