//! IBAN normalization and validation.
//!
//! Input is normalized (spaces stripped, uppercased) before checking the
//! character set, the country-specific length, and the ISO 7064 mod-97
//! checksum. Countries missing from the length table fall back to the
//! standard 15 to 34 character bound.

use thiserror::Error;

/// Shortest IBAN issued anywhere (Norway).
pub const MIN_LEN: usize = 15;
/// Longest IBAN permitted by the standard.
pub const MAX_LEN: usize = 34;

/// Per-country IBAN lengths for the SEPA area.
const COUNTRY_LENGTHS: &[(&str, usize)] = &[
    ("AD", 24),
    ("AT", 20),
    ("BE", 16),
    ("BG", 22),
    ("CH", 21),
    ("CY", 28),
    ("CZ", 24),
    ("DE", 22),
    ("DK", 18),
    ("EE", 20),
    ("ES", 24),
    ("FI", 18),
    ("FR", 27),
    ("GB", 22),
    ("GI", 23),
    ("GR", 27),
    ("HR", 21),
    ("HU", 28),
    ("IE", 22),
    ("IS", 26),
    ("IT", 27),
    ("LI", 21),
    ("LT", 20),
    ("LU", 20),
    ("LV", 21),
    ("MC", 27),
    ("MT", 31),
    ("NL", 18),
    ("NO", 15),
    ("PL", 28),
    ("PT", 25),
    ("RO", 24),
    ("SE", 24),
    ("SI", 19),
    ("SK", 24),
    ("SM", 27),
];

/// Reasons an IBAN fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    #[error("iban is empty")]
    Empty,

    #[error("iban contains invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("iban for country {country} must be {expected} characters, got {actual}")]
    InvalidLength {
        country: String,
        expected: usize,
        actual: usize,
    },

    #[error("iban length {0} is outside the {MIN_LEN}..={MAX_LEN} range")]
    LengthOutOfRange(usize),

    #[error("iban checksum is invalid")]
    InvalidChecksum,
}

/// Validates an IBAN and returns its normalized form.
///
/// # Errors
///
/// Returns `IbanError` when the input is empty, contains characters outside
/// `A-Z0-9`, has the wrong length for its country, or fails the mod-97
/// checksum.
pub fn validate(input: &str) -> Result<String, IbanError> {
    let normalized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() {
        return Err(IbanError::Empty);
    }
    if let Some(bad) = normalized
        .chars()
        .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit())
    {
        return Err(IbanError::InvalidCharacter(bad));
    }
    if normalized.len() < MIN_LEN || normalized.len() > MAX_LEN {
        return Err(IbanError::LengthOutOfRange(normalized.len()));
    }

    let country = &normalized[..2];
    if let Some((_, expected)) = COUNTRY_LENGTHS.iter().find(|(code, _)| *code == country) {
        if normalized.len() != *expected {
            return Err(IbanError::InvalidLength {
                country: country.to_string(),
                expected: *expected,
                actual: normalized.len(),
            });
        }
    }

    if mod97(&normalized) != 1 {
        return Err(IbanError::InvalidChecksum);
    }
    Ok(normalized)
}

/// ISO 7064 mod-97 over the rearranged IBAN (first four characters moved to
/// the end, letters mapped to 10..=35).
fn mod97(iban: &str) -> u32 {
    let rearranged = iban[4..].bytes().chain(iban[..4].bytes());
    let mut rem: u32 = 0;
    for byte in rearranged {
        if byte.is_ascii_digit() {
            rem = (rem * 10 + u32::from(byte - b'0')) % 97;
        } else {
            rem = (rem * 100 + u32::from(byte - b'A') + 10) % 97;
        }
    }
    rem
}
