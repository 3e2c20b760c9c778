//! Sign-up form validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{auth::SignUp, validation::ValidationErrors};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

const PHONE_DIGITS: usize = 11;

/// Raw sign-up form input.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignUpField {
    Name,
    Email,
    Phone,
    Password,
    PasswordConfirmation,
}

impl fmt::Display for SignUpField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::PasswordConfirmation => "password_confirmation",
        })
    }
}

/// Validate a sign-up form.
///
/// # Errors
///
/// Returns every field error found in the form.
pub fn validate_sign_up(form: &SignUpForm) -> Result<SignUp, ValidationErrors<SignUpField>> {
    let mut errors = ValidationErrors::new();

    let name = form.name.trim();
    let email = form.email.trim().to_lowercase();
    let phone = format_phone(&form.phone);

    if name.is_empty() {
        errors.push(SignUpField::Name, "name is required");
    }

    if email.is_empty() {
        errors.push(SignUpField::Email, "email is required");
    } else if !email.contains('@') {
        errors.push(SignUpField::Email, "email is invalid");
    }

    if phone.is_empty() {
        errors.push(SignUpField::Phone, "phone is required");
    }

    if form.password.is_empty() {
        errors.push(SignUpField::Password, "password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(
            SignUpField::Password,
            format!("password must have at least {MIN_PASSWORD_CHARS} characters"),
        );
    }

    if form.password_confirmation.is_empty() {
        errors.push(
            SignUpField::PasswordConfirmation,
            "password confirmation is required",
        );
    } else if form.password != form.password_confirmation {
        errors.push(SignUpField::PasswordConfirmation, "passwords do not match");
    }

    errors.into_result(|| SignUp {
        name: name.to_string(),
        email,
        phone,
        password: form.password.clone(),
    })
}

/// Apply the `(xx) xxxxx-xxxx` mask to whatever digits were typed.
///
/// Non-digits are dropped and input past eleven digits is ignored, so a
/// partially typed number yields a partial mask (`"119"` → `"(11) 9"`).
#[must_use]
pub fn format_phone(value: &str) -> String {
    let digits: String = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect();

    if digits.is_empty() {
        return digits;
    }

    // Every char is ASCII, so byte offsets are char offsets.
    match digits.len() {
        0..=2 => format!("({digits}"),
        3..=7 => format!("({}) {}", &digits[..2], &digits[2..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}
