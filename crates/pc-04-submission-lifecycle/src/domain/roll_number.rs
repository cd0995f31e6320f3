//! Roll number normalisation.
//!
//! Institutional format: `YYCCNBNNXX`
//!
//! | Position | Content | Example |
//! |----------|---------|---------|
//! | 0-1 | admission year digits | `23` |
//! | 2-3 | college code letters | `JR` |
//! | 4 | digit | `1` |
//! | 5 | letter | `A` |
//! | 6-7 | branch digits | `05` |
//! | 8-9 | serial, letters or digits | `A4` |

use shared_types::{StudentId, ValidationError};

/// Upper-cases and trims `raw`, then checks the institutional format.
pub fn normalize_roll_number(raw: &str) -> Result<StudentId, ValidationError> {
    let upper = raw.trim().to_ascii_uppercase();
    if is_valid_roll_number(&upper) {
        Ok(StudentId::new(upper))
    } else {
        Err(ValidationError::InvalidStudentId(raw.to_string()))
    }
}

/// Checks an already upper-cased roll number.
pub fn is_valid_roll_number(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != 10 {
        return false;
    }

    let digit = |b: u8| b.is_ascii_digit();
    let letter = |b: u8| b.is_ascii_uppercase();
    let alnum = |b: u8| b.is_ascii_digit() || b.is_ascii_uppercase();

    digit(bytes[0])
        && digit(bytes[1])
        && letter(bytes[2])
        && letter(bytes[3])
        && digit(bytes[4])
        && letter(bytes[5])
        && digit(bytes[6])
        && digit(bytes[7])
        && alnum(bytes[8])
        && alnum(bytes[9])
}
