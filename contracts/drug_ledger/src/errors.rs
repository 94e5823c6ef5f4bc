use soroban_sdk::{contracttype, Env, String};

/// Error categories for classifying ledger failures
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Validation errors: malformed or out-of-range request parameters
    Validation = 1,
    /// Authorization errors: caller lacks the role or capability
    Authorization = 2,
    /// Not found errors: batch, identity or history lookups
    NotFound = 3,
    /// State conflict errors: duplicate registrations, illegal custody moves
    StateConflict = 4,
    /// System errors: contract lifecycle and feature gating
    System = 5,
}

/// Error severity levels
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    /// Caller can fix the request and resubmit
    Low = 1,
    /// Rejected for policy reasons, worth surfacing to operators
    Medium = 2,
    /// Points at a possible counterfeit or broken chain of custody
    High = 3,
}

/// Error metadata a client can look up by code to explain a rejection.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorInfo {
    pub code: u32,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    AlreadyRegistered = 4,
    InvalidRole = 5,
    EmptyName = 6,
    InvalidAddress = 7,
    BatchAlreadyExists = 8,
    EmptyBatchId = 9,
    EmptyDrugName = 10,
    InvalidFingerprintLength = 11,
    InvalidFingerprintFormat = 12,
    InvalidDateRange = 13,
    AlreadyExpired = 14,
    InvalidNewOwner = 15,
    SelfTransfer = 16,
    EmptyLocation = 17,
    InvalidTransferChain = 18,
    NotCurrentOwner = 19,
    BatchNotFound = 20,
    IdentityNotFound = 21,
    IndexOutOfRange = 22,
    LegacyAdoptionDisabled = 23,
    IdentityNotProvisional = 24,
}

impl ContractError {
    pub fn from_code(code: u32) -> Option<ContractError> {
        let error = match code {
            1 => ContractError::NotInitialized,
            2 => ContractError::AlreadyInitialized,
            3 => ContractError::Unauthorized,
            4 => ContractError::AlreadyRegistered,
            5 => ContractError::InvalidRole,
            6 => ContractError::EmptyName,
            7 => ContractError::InvalidAddress,
            8 => ContractError::BatchAlreadyExists,
            9 => ContractError::EmptyBatchId,
            10 => ContractError::EmptyDrugName,
            11 => ContractError::InvalidFingerprintLength,
            12 => ContractError::InvalidFingerprintFormat,
            13 => ContractError::InvalidDateRange,
            14 => ContractError::AlreadyExpired,
            15 => ContractError::InvalidNewOwner,
            16 => ContractError::SelfTransfer,
            17 => ContractError::EmptyLocation,
            18 => ContractError::InvalidTransferChain,
            19 => ContractError::NotCurrentOwner,
            20 => ContractError::BatchNotFound,
            21 => ContractError::IdentityNotFound,
            22 => ContractError::IndexOutOfRange,
            23 => ContractError::LegacyAdoptionDisabled,
            24 => ContractError::IdentityNotProvisional,
            _ => return None,
        };
        Some(error)
    }

    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::InvalidRole
            | ContractError::EmptyName
            | ContractError::InvalidAddress
            | ContractError::EmptyBatchId
            | ContractError::EmptyDrugName
            | ContractError::InvalidFingerprintLength
            | ContractError::InvalidFingerprintFormat
            | ContractError::InvalidDateRange
            | ContractError::AlreadyExpired
            | ContractError::InvalidNewOwner
            | ContractError::SelfTransfer
            | ContractError::EmptyLocation
            | ContractError::IndexOutOfRange => ErrorCategory::Validation,
            ContractError::Unauthorized | ContractError::NotCurrentOwner => {
                ErrorCategory::Authorization
            }
            ContractError::BatchNotFound | ContractError::IdentityNotFound => {
                ErrorCategory::NotFound
            }
            ContractError::AlreadyRegistered
            | ContractError::BatchAlreadyExists
            | ContractError::InvalidTransferChain
            | ContractError::IdentityNotProvisional => ErrorCategory::StateConflict,
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::LegacyAdoptionDisabled => ErrorCategory::System,
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::InvalidTransferChain
            | ContractError::NotCurrentOwner
            | ContractError::BatchAlreadyExists => ErrorSeverity::High,
            ContractError::Unauthorized
            | ContractError::AlreadyRegistered
            | ContractError::AlreadyExpired
            | ContractError::LegacyAdoptionDisabled => ErrorSeverity::Medium,
            _ => ErrorSeverity::Low,
        }
    }

    /// Returns a human-readable message describing how the request failed.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::Unauthorized => "Caller is not authorized for this operation",
            ContractError::AlreadyRegistered => "Address already has an identity",
            ContractError::InvalidRole => "Role must not be NONE",
            ContractError::EmptyName => "Name must not be empty",
            ContractError::InvalidAddress => "Address cannot hold an identity",
            ContractError::BatchAlreadyExists => "Batch id is already registered",
            ContractError::EmptyBatchId => "Batch id must not be empty",
            ContractError::EmptyDrugName => "Drug name must not be empty",
            ContractError::InvalidFingerprintLength => {
                "Composition fingerprint must be exactly 64 characters"
            }
            ContractError::InvalidFingerprintFormat => {
                "Composition fingerprint must be hexadecimal"
            }
            ContractError::InvalidDateRange => "Expiry time must be after manufacture time",
            ContractError::AlreadyExpired => "Expiry time must be in the future",
            ContractError::InvalidNewOwner => "New owner cannot receive custody",
            ContractError::SelfTransfer => "New owner must differ from the caller",
            ContractError::EmptyLocation => "Transfer location must not be empty",
            ContractError::InvalidTransferChain => "Role pair is not a legal custody transfer",
            ContractError::NotCurrentOwner => "Caller does not hold custody of the batch",
            ContractError::BatchNotFound => "Batch not found",
            ContractError::IdentityNotFound => "Identity not found",
            ContractError::IndexOutOfRange => "Custody record index out of range",
            ContractError::LegacyAdoptionDisabled => "Legacy batch adoption is disabled",
            ContractError::IdentityNotProvisional => "Identity is already confirmed",
        }
    }
}

pub fn error_info(env: &Env, error: ContractError) -> ErrorInfo {
    ErrorInfo {
        code: error as u32,
        category: error.category(),
        severity: error.severity(),
        message: String::from_str(env, error.message()),
    }
}
