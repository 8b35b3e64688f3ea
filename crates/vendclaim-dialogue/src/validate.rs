// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-step input validation.
//!
//! Pure functions. A failure never leaves the controller: it re-prompts the
//! same step and leaves the dialogue untouched.

use thiserror::Error;

/// Longest accepted amount, in digits.
pub const MAX_AMOUNT_DIGITS: usize = 6;

/// Why a dialogue input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("phone number is empty")]
    EmptyPhone,

    #[error("amount must be 1 to {MAX_AMOUNT_DIGITS} digits")]
    InvalidAmount,

    #[error("comment is empty")]
    EmptyComment,
}

impl ValidationError {
    /// The dialogue field this error belongs to, used as a metric label.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyPhone => "phone",
            ValidationError::InvalidAmount => "amount",
            ValidationError::EmptyComment => "comment",
        }
    }
}

/// Accept any typed phone number that is non-empty after trimming.
pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPhone);
    }
    Ok(trimmed.to_string())
}

/// A phone number shared through the contact button. The platform has
/// already validated it, so it passes through unchanged.
pub fn accept_contact(phone: &str) -> String {
    phone.to_string()
}

/// Accept exactly 1 to 6 ASCII digits. The input is not trimmed, so
/// `" 50"` is rejected.
pub fn validate_amount(raw: &str) -> Result<u32, ValidationError> {
    if raw.is_empty()
        || raw.len() > MAX_AMOUNT_DIGITS
        || !raw.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ValidationError::InvalidAmount);
    }
    raw.parse().map_err(|_| ValidationError::InvalidAmount)
}

/// Accept any comment that is non-empty after trimming. No length cap.
pub fn validate_comment(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn phone_is_trimmed() {
        assert_eq!(validate_phone("  +7 900 123  ").unwrap(), "+7 900 123");
        assert_eq!(validate_phone(" \n\t"), Err(ValidationError::EmptyPhone));
    }

    #[test]
    fn contact_passes_through() {
        assert_eq!(accept_contact("+1234567890"), "+1234567890");
    }

    #[test]
    fn amount_accepts_boundaries() {
        assert_eq!(validate_amount("0"), Ok(0));
        assert_eq!(validate_amount("50"), Ok(50));
        assert_eq!(validate_amount("007"), Ok(7));
        assert_eq!(validate_amount("999999"), Ok(999_999));
    }

    #[test]
    fn amount_rejects_malformed_input() {
        for raw in ["abc", "1234567", "", "-5", " 50", "50 ", "5.0", "+5", "１２", "5 0"] {
            assert_eq!(
                validate_amount(raw),
                Err(ValidationError::InvalidAmount),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn comment_is_trimmed_and_uncapped() {
        assert_eq!(validate_comment("  ok \n").unwrap(), "ok");
        assert_eq!(validate_comment("   "), Err(ValidationError::EmptyComment));
        let long = "a".repeat(100_000);
        assert_eq!(validate_comment(&long).unwrap().len(), 100_000);
    }

    #[test]
    fn error_fields_name_the_step() {
        assert_eq!(ValidationError::EmptyPhone.field(), "phone");
        assert_eq!(ValidationError::InvalidAmount.field(), "amount");
        assert_eq!(ValidationError::EmptyComment.field(), "comment");
    }

    proptest! {
        #[test]
        fn any_one_to_six_digits_parse_to_their_value(n in 0u32..=999_999) {
            prop_assert_eq!(validate_amount(&n.to_string()), Ok(n));
        }

        #[test]
        fn amount_validator_never_panics(raw in ".*") {
            let _ = validate_amount(&raw);
        }

        #[test]
        fn anything_with_a_non_digit_is_rejected(
            prefix in "[0-9]{0,3}",
            bad in "[^0-9]",
            suffix in "[0-9]{0,2}",
        ) {
            let raw = format!("{prefix}{bad}{suffix}");
            prop_assert_eq!(validate_amount(&raw), Err(ValidationError::InvalidAmount));
        }

        #[test]
        fn seven_or_more_digits_are_rejected(raw in "[0-9]{7,12}") {
            prop_assert_eq!(validate_amount(&raw), Err(ValidationError::InvalidAmount));
        }

        #[test]
        fn non_blank_comments_are_accepted(raw in "\\PC*[a-z]\\PC*") {
            prop_assert!(validate_comment(&raw).is_ok());
        }
    }
}
