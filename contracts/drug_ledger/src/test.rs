#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use super::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::Env;

const ZERO_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

fn setup() -> (Env, DrugLedgerContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(500);

    let contract_id = env.register(DrugLedgerContract, ());
    let client = DrugLedgerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    (env, client, admin)
}

fn register(
    env: &Env,
    client: &DrugLedgerContractClient<'_>,
    admin: &Address,
    role: Role,
    name: &str,
) -> Address {
    let address = Address::generate(env);
    client.register_identity(admin, &address, &role, &String::from_str(env, name));
    address
}

fn register_b1(env: &Env, client: &DrugLedgerContractClient<'_>, manufacturer: &Address) -> Batch {
    client.register_batch(
        manufacturer,
        &String::from_str(env, "B1"),
        &String::from_str(env, "Paracetamol"),
        &String::from_str(env, ZERO_DIGEST),
        &1000,
        &2000,
    )
}

#[test]
fn test_initialize() {
    let env = Env::default();
    let contract_id = env.register(DrugLedgerContract, ());
    let client = DrugLedgerContractClient::new(&env, &contract_id);

    assert!(!client.is_initialized());
    let admin = Address::generate(&env);
    client.initialize(&admin);

    assert!(client.is_initialized());
    assert_eq!(client.get_admin(), admin);
    assert_eq!(client.get_config(), LedgerConfig::default_policy());

    let result = client.try_initialize(&Address::generate(&env));
    assert_eq!(result, Err(Ok(ContractError::AlreadyInitialized)));
}

#[test]
fn test_mutations_require_initialization() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(DrugLedgerContract, ());
    let client = DrugLedgerContractClient::new(&env, &contract_id);

    let user = Address::generate(&env);
    let result = client.try_register_identity(
        &user,
        &user,
        &Role::Manufacturer,
        &String::from_str(&env, "Acme"),
    );
    assert_eq!(result, Err(Ok(ContractError::NotInitialized)));
}

#[test]
fn test_register_batch_creates_genesis() {
    let (env, client, admin) = setup();
    let manufacturer = register(&env, &client, &admin, Role::Manufacturer, "Acme Pharma");

    let batch = register_b1(&env, &client, &manufacturer);
    assert_eq!(batch.current_owner, manufacturer);
    assert_eq!(batch.manufacturer, manufacturer);
    assert!(batch.registered);
    assert!(!batch.legacy);
    assert_eq!(batch.registered_at, 500);

    let history = client.get_history(&String::from_str(&env, "B1"));
    assert_eq!(history.len(), 1);
    let genesis = history.get(0).unwrap();
    assert_eq!(genesis.from, None);
    assert_eq!(genesis.to, manufacturer);
    assert_eq!(genesis.from_role, Role::None);
    assert_eq!(genesis.to_role, Role::Manufacturer);
    assert_eq!(
        genesis.location,
        String::from_str(&env, "Manufacturing Facility")
    );
}

#[test]
fn test_full_chain_to_pharmacy() {
    let (env, client, admin) = setup();
    let m = register(&env, &client, &admin, Role::Manufacturer, "M");
    let d = register(&env, &client, &admin, Role::Distributor, "D");
    let p = register(&env, &client, &admin, Role::Pharmacy, "P");
    let x = register(&env, &client, &admin, Role::Consumer, "X");
    let b1 = String::from_str(&env, "B1");

    register_b1(&env, &client, &m);

    let record = client.transfer_custody(&m, &b1, &d, &String::from_str(&env, "Warehouse"));
    assert_eq!(record.from, Some(m.clone()));
    assert_eq!(record.from_role, Role::Manufacturer);
    assert_eq!(record.to_role, Role::Distributor);
    assert_eq!(client.get_batch(&b1).current_owner, d);
    assert_eq!(client.get_history(&b1).len(), 2);

    client.transfer_custody(&d, &b1, &p, &String::from_str(&env, "Pharmacy Store"));
    assert_eq!(client.get_batch(&b1).current_owner, p);
    assert_eq!(client.get_history(&b1).len(), 3);

    let result = client.try_transfer_custody(&p, &b1, &x, &String::from_str(&env, "Somewhere"));
    assert_eq!(result, Err(Ok(ContractError::InvalidTransferChain)));
    assert_eq!(client.get_history(&b1).len(), 3);
    assert_eq!(client.get_batch(&b1).current_owner, p);
}

#[test]
fn test_invalid_date_range() {
    let (env, client, admin) = setup();
    let m = register(&env, &client, &admin, Role::Manufacturer, "M");

    let result = client.try_register_batch(
        &m,
        &String::from_str(&env, "B2"),
        &String::from_str(&env, "Ibuprofen"),
        &String::from_str(&env, ZERO_DIGEST),
        &2000,
        &2000,
    );
    assert_eq!(result, Err(Ok(ContractError::InvalidDateRange)));
    assert!(!client.batch_exists(&String::from_str(&env, "B2")));
}

#[test]
fn test_already_expired() {
    let (env, client, admin) = setup();
    let m = register(&env, &client, &admin, Role::Manufacturer, "M");
    env.ledger().set_timestamp(2000);

    let result = client.try_register_batch(
        &m,
        &String::from_str(&env, "B1"),
        &String::from_str(&env, "Paracetamol"),
        &String::from_str(&env, ZERO_DIGEST),
        &1000,
        &2000,
    );
    assert_eq!(result, Err(Ok(ContractError::AlreadyExpired)));
}

#[test]
fn test_audit_incomplete_chain() {
    let (env, client, admin) = setup();
    let m = register(&env, &client, &admin, Role::Manufacturer, "M");
    let regulator = register(&env, &client, &admin, Role::Regulator, "FDA");
    register_b1(&env, &client, &m);

    let audit = client.audit_batch(&regulator, &String::from_str(&env, "B1"));
    assert!(audit.has_anomalies);
    assert_eq!(audit.anomaly, AnomalyKind::IncompleteChain);
    assert_eq!(
        audit.label,
        String::from_str(&env, "Incomplete ownership chain")
    );
    assert_eq!(audit.transfer_count, 1);
}

#[test]
fn test_get_identity_zero_value() {
    let (env, client, _admin) = setup();
    let stranger = Address::generate(&env);

    let identity = client.get_identity(&stranger);
    assert_eq!(identity.address, stranger);
    assert_eq!(identity.role, Role::None);
    assert!(!identity.registered);
    assert_eq!(identity.registered_at, 0);
}

#[test]
fn test_statistics_are_derived() {
    let (env, client, admin) = setup();
    let m = register(&env, &client, &admin, Role::Manufacturer, "M");
    let d = register(&env, &client, &admin, Role::Distributor, "D");

    assert_eq!(
        client.get_statistics(),
        LedgerStats {
            total_batches: 0,
            total_identities: 2,
            total_transfers: 0,
        }
    );

    register_b1(&env, &client, &m);
    client.transfer_custody(
        &m,
        &String::from_str(&env, "B1"),
        &d,
        &String::from_str(&env, "Warehouse"),
    );

    let stats = client.get_statistics();
    assert_eq!(stats.total_batches, 1);
    assert_eq!(stats.total_identities, 2);
    assert_eq!(stats.total_transfers, 2);
}

#[test]
fn test_set_config_admin_only() {
    let (env, client, admin) = setup();
    let outsider = Address::generate(&env);
    let policy = LedgerConfig {
        enforce_current_owner: true,
        legacy_adoption: true,
        auto_provision: false,
    };

    let result = client.try_set_config(&outsider, &policy);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
    assert_eq!(client.get_config(), LedgerConfig::default_policy());

    client.set_config(&admin, &policy);
    assert_eq!(client.get_config(), policy);
}

#[test]
fn test_version() {
    assert_eq!(DrugLedgerContract::version(), 1);
}
