use soroban_sdk::contracttype;

/// Capability classification of a supply-chain participant.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    None = 0,
    Manufacturer = 1,
    Distributor = 2,
    Pharmacy = 3,
    Consumer = 4,
    Regulator = 5,
}

/// Legal custody moves. Pharmacy is terminal; consumers and regulators never
/// hold custody through a transfer.
pub fn is_legal_transfer(from: Role, to: Role) -> bool {
    matches!(
        (from, to),
        (Role::Manufacturer, Role::Distributor)
            | (Role::Distributor, Role::Pharmacy)
            | (Role::Distributor, Role::Distributor)
    )
}

pub fn can_audit(role: Role) -> bool {
    role == Role::Regulator
}

pub fn can_register_batch(role: Role) -> bool {
    role == Role::Manufacturer
}

/// Role assigned to an unknown transfer sender when it is provisioned.
pub const PROVISIONAL_SENDER_ROLE: Role = Role::Distributor;
/// Role assigned to an unknown transfer recipient when it is provisioned.
pub const PROVISIONAL_RECIPIENT_ROLE: Role = Role::Pharmacy;
/// Role assigned to an unknown batch registrant when it is provisioned.
pub const PROVISIONAL_REGISTRANT_ROLE: Role = Role::Manufacturer;
