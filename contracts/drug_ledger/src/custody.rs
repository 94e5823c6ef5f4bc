use crate::config;
use crate::events;
use crate::registry;
use crate::roles::{self, Role, PROVISIONAL_RECIPIENT_ROLE, PROVISIONAL_SENDER_ROLE};
use crate::validation;
use crate::{ContractError, CustodyRecord, Identity};
use soroban_sdk::{Address, Env, String};

/// Role a transfer party acts under: its registered role, the provisional
/// role it would be given, or `None`.
fn effective_role(identity: &Option<Identity>, auto_provision: bool, provisional: Role) -> Role {
    match identity {
        Some(identity) => identity.role,
        None if auto_provision => provisional,
        None => Role::None,
    }
}

/// Moves custody of `batch_id` from the batch's current owner to `new_owner`.
///
/// Every precondition is checked before the first write: unknown batches are
/// adopted only when legacy adoption is on, unknown parties are provisioned
/// only when auto-provisioning is on, and the `(caller role, new owner role)`
/// pair must be a legal move. The caller is checked against the current owner
/// only when `enforce_current_owner` is set.
pub fn transfer_custody(
    env: &Env,
    caller: &Address,
    batch_id: &String,
    new_owner: &Address,
    location: &String,
) -> Result<CustodyRecord, ContractError> {
    validation::validate_batch_id(batch_id)?;
    if *new_owner == env.current_contract_address() {
        return Err(ContractError::InvalidNewOwner);
    }
    if new_owner == caller {
        return Err(ContractError::SelfTransfer);
    }
    validation::validate_location(location)?;

    let cfg = config::get_config(env);
    let existing = registry::get_batch(env, batch_id);
    if existing.is_none() && !cfg.legacy_adoption {
        return Err(ContractError::BatchNotFound);
    }

    let sender = registry::get_identity(env, caller);
    let recipient = registry::get_identity(env, new_owner);
    let from_role = effective_role(&sender, cfg.auto_provision, PROVISIONAL_SENDER_ROLE);
    let to_role = effective_role(&recipient, cfg.auto_provision, PROVISIONAL_RECIPIENT_ROLE);

    if !roles::is_legal_transfer(from_role, to_role) {
        return Err(ContractError::InvalidTransferChain);
    }

    if cfg.enforce_current_owner {
        if let Some(batch) = &existing {
            if batch.current_owner != *caller {
                return Err(ContractError::NotCurrentOwner);
            }
        }
    }

    if sender.is_none() {
        registry::provision_identity(env, caller, from_role);
    }
    if recipient.is_none() {
        registry::provision_identity(env, new_owner, to_role);
    }

    let mut batch = match existing {
        Some(batch) => batch,
        None => registry::adopt(env, caller, batch_id),
    };

    let previous_owner = batch.current_owner.clone();
    let record = CustodyRecord {
        from: Some(previous_owner.clone()),
        to: new_owner.clone(),
        timestamp: env.ledger().timestamp(),
        location: location.clone(),
        from_role,
        to_role,
    };
    registry::record_custody_change(env, &mut batch, record.clone());
    events::publish_custody_transferred(env, batch_id.clone(), &record, previous_owner);

    Ok(record)
}
