use rand::Rng;
use std::fmt;

/// Issuing-institution prefix shared by every account number.
pub const BIN_PREFIX: &str = "400000";

/// Full account number length: BIN prefix + random body + check digit.
pub const ACCOUNT_NUMBER_LENGTH: usize = 16;

/// Random digits between the BIN prefix and the check digit.
const BODY_LENGTH: usize = 9;

/// PIN codes are 4 decimal digits.
pub const PIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Not a decimal-digit string of the expected length.
    Malformed,
    /// Well-formed, but the trailing digit disagrees with the Luhn relation.
    ChecksumMismatch,
}

impl fmt::Display for NumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberError::Malformed => {
                write!(f, "account number must be {} decimal digits", ACCOUNT_NUMBER_LENGTH)
            }
            NumberError::ChecksumMismatch => write!(f, "account number failed the checksum"),
        }
    }
}

impl std::error::Error for NumberError {}

/// Compute the Luhn check digit over a decimal-digit payload.
/// Digits at even 0-based positions are doubled (minus 9 when the double
/// exceeds 9), everything is summed, and the check digit is whatever makes
/// the total a multiple of 10.
pub fn checksum_digit(payload: &str) -> Result<u8, NumberError> {
    let digits = digits_of(payload)?;
    if digits.is_empty() {
        return Err(NumberError::Malformed);
    }
    Ok(luhn_digit(&digits))
}

/// Validate a full 16-digit account number, check digit included.
pub fn validate(number: &str) -> Result<(), NumberError> {
    if number.len() != ACCOUNT_NUMBER_LENGTH {
        return Err(NumberError::Malformed);
    }

    let digits = digits_of(number)?;
    let (payload, check) = digits.split_at(digits.len() - 1);

    if luhn_digit(payload) != check[0] {
        return Err(NumberError::ChecksumMismatch);
    }

    Ok(())
}

/// Generate a candidate account number: BIN prefix, 9 random digits, and
/// the Luhn check digit over the first 15. Uniqueness against the store is
/// the caller's job.
pub fn random_account_number(rng: &mut impl Rng) -> String {
    let mut digits: Vec<u8> = BIN_PREFIX.bytes().map(|b| b - b'0').collect();
    digits.extend((0..BODY_LENGTH).map(|_| rng.gen_range(0..10u8)));
    digits.push(luhn_digit(&digits));

    digits.iter().map(|&d| char::from(b'0' + d)).collect()
}

/// Generate a random 4-digit PIN. No uniqueness requirement.
pub fn random_pin(rng: &mut impl Rng) -> String {
    (0..PIN_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn luhn_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let mut d = u32::from(d);
            if i % 2 == 0 {
                d *= 2;
                if d > 9 {
                    d -= 9;
                }
            }
            d
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

fn digits_of(s: &str) -> Result<Vec<u8>, NumberError> {
    s.chars()
        .map(|c| c.to_digit(10).map(|d| d as u8).ok_or(NumberError::Malformed))
        .collect()
}
