use crate::events;
use crate::registry;
use crate::roles;
use crate::validation;
use crate::{Batch, ContractError, CustodyRecord};
use soroban_sdk::{contracttype, Address, Env, String, Vec};

/// Upper bound on the batch ids a single regulator sweep examines.
pub const MAX_SWEEP_PAGE: u32 = 50;

/// Outcome of a public authenticity check.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerificationResult {
    pub batch_id: String,
    pub is_genuine: bool,
    pub drug_name: String,
    pub manufacturer: Address,
    pub fingerprint: String,
    pub manufacture_time: u64,
    pub expiry_time: u64,
    pub current_owner: Address,
    pub transfer_count: u32,
}

/// Per-id outcome of a bulk verification.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchCheck {
    pub batch_id: String,
    pub found: bool,
    pub is_genuine: bool,
}

/// Custody-chain deviations surfaced to regulators, lowest value first.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AnomalyKind {
    None = 0,
    Expired = 1,
    IncompleteChain = 2,
    SameRoleTransfer = 3,
}

impl AnomalyKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyKind::None => "None",
            AnomalyKind::Expired => "Drug expired",
            AnomalyKind::IncompleteChain => "Incomplete ownership chain",
            AnomalyKind::SameRoleTransfer => "Same role transfer detected",
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditResult {
    pub batch_id: String,
    pub has_anomalies: bool,
    pub anomaly: AnomalyKind,
    pub label: String,
    pub transfer_count: u32,
}

fn is_genuine(now: u64, batch: &Batch, history: &Vec<CustodyRecord>) -> bool {
    now <= batch.expiry_time && !history.is_empty()
}

/// Single-label anomaly rule. Expiry wins over chain length, and chain
/// length wins over the record scan; within the scan the last hit stands.
/// The scan covers transfers only, never the genesis record.
pub fn detect_anomaly(now: u64, batch: &Batch, history: &Vec<CustodyRecord>) -> AnomalyKind {
    let mut anomaly = AnomalyKind::None;

    if now > batch.expiry_time {
        anomaly = AnomalyKind::Expired;
    } else if history.len() < 2 {
        anomaly = AnomalyKind::IncompleteChain;
    } else {
        for record in history.iter().skip(1) {
            if record.from_role == record.to_role {
                anomaly = AnomalyKind::SameRoleTransfer;
            }
        }
    }

    anomaly
}

fn require_regulator(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if !roles::can_audit(registry::role_of(env, caller)) {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Batch ids at positions `start..start + limit` of the registration index,
/// with `limit` capped at `MAX_SWEEP_PAGE`.
fn sweep_window(env: &Env, start: u32, limit: u32) -> Vec<String> {
    let ids = registry::batch_ids(env);
    let end = start
        .saturating_add(limit.min(MAX_SWEEP_PAGE))
        .min(ids.len());

    let mut window = Vec::new(env);
    for i in start..end {
        if let Some(batch_id) = ids.get(i) {
            window.push_back(batch_id);
        }
    }
    window
}

pub fn verify(env: &Env, batch_id: &String) -> Result<VerificationResult, ContractError> {
    let batch = registry::require_batch(env, batch_id)?;
    let history = registry::get_history(env, batch_id);
    let genuine = is_genuine(env.ledger().timestamp(), &batch, &history);

    events::publish_batch_verified(env, batch_id.clone(), genuine, history.len());

    Ok(VerificationResult {
        batch_id: batch.batch_id,
        is_genuine: genuine,
        drug_name: batch.drug_name,
        manufacturer: batch.manufacturer,
        fingerprint: batch.fingerprint,
        manufacture_time: batch.manufacture_time,
        expiry_time: batch.expiry_time,
        current_owner: batch.current_owner,
        transfer_count: history.len(),
    })
}

/// Bulk verification. Unknown ids are reported as not found instead of failing the call.
pub fn verify_batches(env: &Env, batch_ids: &Vec<String>) -> Vec<BatchCheck> {
    let now = env.ledger().timestamp();
    let mut checks = Vec::new(env);

    for batch_id in batch_ids.iter() {
        let check = match registry::get_batch(env, &batch_id) {
            Some(batch) => {
                let history = registry::get_history(env, &batch_id);
                let genuine = is_genuine(now, &batch, &history);
                events::publish_batch_verified(env, batch_id.clone(), genuine, history.len());
                BatchCheck {
                    batch_id,
                    found: true,
                    is_genuine: genuine,
                }
            }
            None => BatchCheck {
                batch_id,
                found: false,
                is_genuine: false,
            },
        };
        checks.push_back(check);
    }

    checks
}

/// Compares a recomputed composition digest with the one stored at registration.
pub fn verify_fingerprint(
    env: &Env,
    batch_id: &String,
    fingerprint: &String,
) -> Result<bool, ContractError> {
    let batch = registry::require_batch(env, batch_id)?;
    Ok(validation::fingerprints_match(&batch.fingerprint, fingerprint))
}

fn audit_unchecked(env: &Env, now: u64, batch: &Batch) -> AuditResult {
    let history = registry::get_history(env, &batch.batch_id);
    let anomaly = detect_anomaly(now, batch, &history);

    AuditResult {
        batch_id: batch.batch_id.clone(),
        has_anomalies: anomaly != AnomalyKind::None,
        anomaly,
        label: String::from_str(env, anomaly.label()),
        transfer_count: history.len(),
    }
}

pub fn audit(env: &Env, caller: &Address, batch_id: &String) -> Result<AuditResult, ContractError> {
    require_regulator(env, caller)?;
    let batch = registry::require_batch(env, batch_id)?;
    Ok(audit_unchecked(env, env.ledger().timestamp(), &batch))
}

/// Audits one page of batches and keeps the ones with an anomaly, in
/// registration order.
pub fn list_anomalous(
    env: &Env,
    caller: &Address,
    start: u32,
    limit: u32,
) -> Result<Vec<AuditResult>, ContractError> {
    require_regulator(env, caller)?;

    let now = env.ledger().timestamp();
    let mut results = Vec::new(env);
    for batch_id in sweep_window(env, start, limit).iter() {
        if let Some(batch) = registry::get_batch(env, &batch_id) {
            let result = audit_unchecked(env, now, &batch);
            if result.has_anomalies {
                results.push_back(result);
            }
        }
    }

    Ok(results)
}

pub fn list_expired(
    env: &Env,
    caller: &Address,
    start: u32,
    limit: u32,
) -> Result<Vec<String>, ContractError> {
    require_regulator(env, caller)?;

    let now = env.ledger().timestamp();
    let mut expired = Vec::new(env);
    for batch_id in sweep_window(env, start, limit).iter() {
        if let Some(batch) = registry::get_batch(env, &batch_id) {
            if now > batch.expiry_time {
                expired.push_back(batch_id);
            }
        }
    }

    Ok(expired)
}

pub fn get_record_at(env: &Env, batch_id: &String, index: u32) -> Result<CustodyRecord, ContractError> {
    registry::require_batch(env, batch_id)?;
    registry::get_history(env, batch_id)
        .get(index)
        .ok_or(ContractError::IndexOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use soroban_sdk::testutils::Address as _;

    fn batch(env: &Env, owner: &Address, expiry_time: u64) -> Batch {
        Batch {
            batch_id: String::from_str(env, "B1"),
            drug_name: String::from_str(env, "Paracetamol"),
            manufacturer: owner.clone(),
            fingerprint: String::from_str(env, ""),
            manufacture_time: 1000,
            expiry_time,
            current_owner: owner.clone(),
            registered: true,
            legacy: false,
            registered_at: 500,
        }
    }

    fn record(env: &Env, to: &Address, from_role: Role, to_role: Role) -> CustodyRecord {
        CustodyRecord {
            from: None,
            to: to.clone(),
            timestamp: 500,
            location: String::from_str(env, "Dock"),
            from_role,
            to_role,
        }
    }

    #[test]
    fn test_expired_takes_precedence_over_chain_shape() {
        let env = Env::default();
        let owner = Address::generate(&env);
        let b = batch(&env, &owner, 2000);
        let mut history = Vec::new(&env);
        history.push_back(record(&env, &owner, Role::None, Role::Manufacturer));

        assert_eq!(detect_anomaly(2001, &b, &history), AnomalyKind::Expired);
        assert_eq!(detect_anomaly(2000, &b, &history), AnomalyKind::IncompleteChain);
    }

    #[test]
    fn test_same_role_scan_and_clean_chain() {
        let env = Env::default();
        let owner = Address::generate(&env);
        let b = batch(&env, &owner, 2000);

        let mut clean = Vec::new(&env);
        clean.push_back(record(&env, &owner, Role::None, Role::Manufacturer));
        clean.push_back(record(&env, &owner, Role::Manufacturer, Role::Distributor));
        clean.push_back(record(&env, &owner, Role::Distributor, Role::Pharmacy));
        assert_eq!(detect_anomaly(1500, &b, &clean), AnomalyKind::None);

        let mut relayed = clean.clone();
        relayed.push_back(record(&env, &owner, Role::Distributor, Role::Distributor));
        assert_eq!(detect_anomaly(1500, &b, &relayed), AnomalyKind::SameRoleTransfer);
    }

    #[test]
    fn test_roleless_genesis_is_not_a_same_role_transfer() {
        let env = Env::default();
        let owner = Address::generate(&env);
        let b = batch(&env, &owner, 2000);

        let mut history = Vec::new(&env);
        history.push_back(record(&env, &owner, Role::None, Role::None));
        history.push_back(record(&env, &owner, Role::Distributor, Role::Pharmacy));
        assert_eq!(detect_anomaly(1500, &b, &history), AnomalyKind::None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AnomalyKind::None.label(), "None");
        assert_eq!(AnomalyKind::Expired.label(), "Drug expired");
        assert_eq!(
            AnomalyKind::IncompleteChain.label(),
            "Incomplete ownership chain"
        );
        assert_eq!(
            AnomalyKind::SameRoleTransfer.label(),
            "Same role transfer detected"
        );
    }
}
