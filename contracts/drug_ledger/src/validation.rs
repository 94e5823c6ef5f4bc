use crate::ContractError;
use soroban_sdk::String;

/// Length of a hex-encoded SHA-256 composition digest.
pub const FINGERPRINT_LEN: u32 = 64;

pub fn validate_name(name: &String) -> Result<(), ContractError> {
    if name.is_empty() {
        return Err(ContractError::EmptyName);
    }
    Ok(())
}

pub fn validate_batch_id(batch_id: &String) -> Result<(), ContractError> {
    if batch_id.is_empty() {
        return Err(ContractError::EmptyBatchId);
    }
    Ok(())
}

pub fn validate_drug_name(drug_name: &String) -> Result<(), ContractError> {
    if drug_name.is_empty() {
        return Err(ContractError::EmptyDrugName);
    }
    Ok(())
}

pub fn validate_location(location: &String) -> Result<(), ContractError> {
    if location.is_empty() {
        return Err(ContractError::EmptyLocation);
    }
    Ok(())
}

/// A fingerprint is exactly 64 hex characters, either case.
pub fn validate_fingerprint(fingerprint: &String) -> Result<(), ContractError> {
    if fingerprint.len() != FINGERPRINT_LEN {
        return Err(ContractError::InvalidFingerprintLength);
    }

    let mut buf = [0u8; FINGERPRINT_LEN as usize];
    fingerprint.copy_into_slice(&mut buf);
    if !buf.iter().all(|b| b.is_ascii_hexdigit()) {
        return Err(ContractError::InvalidFingerprintFormat);
    }

    Ok(())
}

/// Expiry must follow manufacture and still lie ahead of `now`.
pub fn validate_dates(now: u64, manufacture_time: u64, expiry_time: u64) -> Result<(), ContractError> {
    if manufacture_time >= expiry_time {
        return Err(ContractError::InvalidDateRange);
    }
    if expiry_time <= now {
        return Err(ContractError::AlreadyExpired);
    }
    Ok(())
}

/// Case-insensitive digest comparison. Anything that is not a well-formed
/// fingerprint never matches.
pub fn fingerprints_match(stored: &String, candidate: &String) -> bool {
    if validate_fingerprint(stored).is_err() || validate_fingerprint(candidate).is_err() {
        return false;
    }

    let mut a = [0u8; FINGERPRINT_LEN as usize];
    let mut b = [0u8; FINGERPRINT_LEN as usize];
    stored.copy_into_slice(&mut a);
    candidate.copy_into_slice(&mut b);
    a.eq_ignore_ascii_case(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn test_fingerprint_accepts_mixed_case_hex() {
        let env = Env::default();
        let upper = String::from_str(
            &env,
            "9F86D081884C7D659A2FEAA0C55AD015A3BF4F1B2B0B822CD15D6C15B0F00A08",
        );
        assert_eq!(validate_fingerprint(&String::from_str(&env, DIGEST)), Ok(()));
        assert_eq!(validate_fingerprint(&upper), Ok(()));
    }

    #[test]
    fn test_fingerprint_length_and_format() {
        let env = Env::default();
        assert_eq!(
            validate_fingerprint(&String::from_str(&env, "abc123")),
            Err(ContractError::InvalidFingerprintLength)
        );
        assert_eq!(
            validate_fingerprint(&String::from_str(&env, "")),
            Err(ContractError::InvalidFingerprintLength)
        );
        let not_hex = String::from_str(
            &env,
            "zz86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
        );
        assert_eq!(
            validate_fingerprint(&not_hex),
            Err(ContractError::InvalidFingerprintFormat)
        );
    }

    #[test]
    fn test_dates() {
        assert_eq!(validate_dates(500, 1000, 2000), Ok(()));
        assert_eq!(
            validate_dates(500, 2000, 2000),
            Err(ContractError::InvalidDateRange)
        );
        assert_eq!(
            validate_dates(500, 3000, 2000),
            Err(ContractError::InvalidDateRange)
        );
        assert_eq!(
            validate_dates(2000, 1000, 2000),
            Err(ContractError::AlreadyExpired)
        );
    }

    #[test]
    fn test_fingerprints_match_ignores_case() {
        let env = Env::default();
        let stored = String::from_str(&env, DIGEST);
        let upper = String::from_str(
            &env,
            "9F86D081884C7D659A2FEAA0C55AD015A3BF4F1B2B0B822CD15D6C15B0F00A08",
        );
        assert!(fingerprints_match(&stored, &upper));
        assert!(!fingerprints_match(&stored, &String::from_str(&env, "")));
        assert!(!fingerprints_match(&String::from_str(&env, ""), &String::from_str(&env, "")));
    }
}
