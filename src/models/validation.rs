// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field rules and request payloads for user mutations.
//!
//! The rules are plain functions over `&str` with no shared state beyond the
//! compiled email pattern.

use crate::error::AppError;
use crate::models::user::UserUpdate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z]{2,6}$").expect("valid regex")
});

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Blank(&'static str),
    #[error("email is not valid")]
    InvalidEmail,
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("bearerToken is immutable")]
    TokenImmutable,
    #[error("no fields to update")]
    EmptyUpdate,
}

impl From<Violation> for AppError {
    fn from(v: Violation) -> Self {
        AppError::BadRequest(v.to_string())
    }
}

/// `local@domain.tld` with a 2-6 letter TLD.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn check_name(name: &str) -> Result<(), Violation> {
    if is_blank(name) {
        return Err(Violation::Blank("name"));
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<(), Violation> {
    if is_blank(email) {
        return Err(Violation::Blank("email"));
    }
    if !is_valid_email(email) {
        return Err(Violation::InvalidEmail);
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<(), Violation> {
    if is_blank(password) {
        return Err(Violation::Blank("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Violation::PasswordTooShort);
    }
    Ok(())
}

/// `validator` hook for required, non-blank strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Describe the first failing field of a `validator` report, e.g.
/// `address.city is required`. Fields are visited in name order.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    first_error(errors, "").unwrap_or_else(|| "invalid request body".to_string())
}

fn first_error(errors: &ValidationErrors, prefix: &str) -> Option<String> {
    let map = errors.errors();
    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();

    for key in keys {
        match &map[key] {
            ValidationErrorsKind::Field(errs) if !errs.is_empty() => {
                return Some(format!("{prefix}{key} is required"));
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(msg) = first_error(inner, &format!("{prefix}{key}.")) {
                    return Some(msg);
                }
            }
            _ => {}
        }
    }
    None
}

/// Body of a user create, replace or patch.
///
/// Unknown keys are ignored; a non-string value for a known key fails to
/// deserialize and surfaces as a bad request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Only inspected to reject it
    pub bearer_token: Option<serde_json::Value>,
}

/// Validated fields of a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserPayload {
    /// All three fields, each passing its rule. Used by create.
    pub fn into_new_user(self) -> Result<NewUserFields, Violation> {
        let name = self.name.ok_or(Violation::Missing("name"))?;
        let email = self.email.ok_or(Violation::Missing("email"))?;
        let password = self.password.ok_or(Violation::Missing("password"))?;

        check_name(&name)?;
        check_email(&email)?;
        check_password(&password)?;

        Ok(NewUserFields {
            name,
            email,
            password,
        })
    }

    /// Full replacement: the create rules plus the token guard.
    pub fn into_replacement(self) -> Result<UserUpdate, Violation> {
        self.reject_token()?;
        let fields = self.into_new_user()?;
        Ok(UserUpdate {
            name: Some(fields.name),
            email: Some(fields.email),
            password: Some(fields.password),
            clientes: None,
        })
    }

    /// Partial update: only supplied fields are checked and written.
    pub fn into_patch(self) -> Result<UserUpdate, Violation> {
        self.reject_token()?;

        let update = UserUpdate {
            name: self.name,
            email: self.email,
            password: self.password,
            clientes: None,
        };
        if update.is_empty() {
            return Err(Violation::EmptyUpdate);
        }

        if let Some(name) = &update.name {
            check_name(name)?;
        }
        if let Some(email) = &update.email {
            check_email(email)?;
        }
        if let Some(password) = &update.password {
            check_password(password)?;
        }
        Ok(update)
    }

    fn reject_token(&self) -> Result<(), Violation> {
        match self.bearer_token {
            Some(_) => Err(Violation::TokenImmutable),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::client::ClientPayload;
    use validator::Validate;

    fn payload(value: serde_json::Value) -> UserPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["ana@x.com", "a.b-c_d@sub.domain.org", "x@y.museum"] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in [
            "ana",
            "ana@x",
            "@x.com",
            "ana@.c",
            "ana@x.c",
            "ana@x.abcdefg",
            "ana @x.com",
            "ana@x.c0m",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_password_length_rule() {
        assert_eq!(check_password("12345"), Err(Violation::PasswordTooShort));
        assert_eq!(check_password("      "), Err(Violation::Blank("password")));
        assert!(check_password("123456").is_ok());
    }

    #[test]
    fn test_create_reports_first_failing_rule() {
        let err = payload(serde_json::json!({
            "name": "  ",
            "email": "bad",
            "password": "1"
        }))
        .into_new_user()
        .unwrap_err();
        assert_eq!(err, Violation::Blank("name"));

        let err = payload(serde_json::json!({ "name": "Ana", "email": "ana@x.com" }))
            .into_new_user()
            .unwrap_err();
        assert_eq!(err, Violation::Missing("password"));
    }

    #[test]
    fn test_replace_rejects_token() {
        let err = payload(serde_json::json!({
            "name": "Ana",
            "email": "ana@x.com",
            "password": "secret1",
            "bearerToken": "new"
        }))
        .into_replacement()
        .unwrap_err();
        assert_eq!(err, Violation::TokenImmutable);
    }

    #[test]
    fn test_patch_rules() {
        let err = payload(serde_json::json!({ "role": "admin" }))
            .into_patch()
            .unwrap_err();
        assert_eq!(err, Violation::EmptyUpdate);

        let err = payload(serde_json::json!({ "email": "nope" }))
            .into_patch()
            .unwrap_err();
        assert_eq!(err, Violation::InvalidEmail);

        let update = payload(serde_json::json!({ "name": "Ana B" }))
            .into_patch()
            .unwrap();
        assert_eq!(update.name.as_deref(), Some("Ana B"));
        assert!(update.email.is_none());
    }

    #[test]
    fn test_describe_nested_client_errors() {
        let client: ClientPayload = serde_json::from_value(serde_json::json!({
            "name": "Bob",
            "email": "bob@x.com",
            "address": { "city": "", "country": "B", "municipality": "C", "state": "D" }
        }))
        .unwrap();

        let errors = client.validate().unwrap_err();
        assert_eq!(describe_errors(&errors), "address.city is required");
    }
}
