//! User accounts known to the console.
//!
//! A user links an email address to an identity-provider subject
//! (`keycloak_id`). The subject is accepted on create and stored, but never
//! echoed back in responses.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{Field, NAME_MIN_CHARS, ValidationError};

pub const EMAIL_MAX_CHARS: usize = 255;
pub const FULL_NAME_MAX_CHARS: usize = 255;
pub const KEYCLOAK_ID_MAX_CHARS: usize = 36;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

/// Body of `POST /users/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub keycloak_id: Option<String>,
}

/// Body of `PATCH /users/{id}`. The email is fixed once created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserInput {
    /// # Errors
    ///
    /// Returns every rule the body breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_email(&mut errors, &self.email);
        check_full_name(&mut errors, &self.full_name);
        if self.keycloak_id.as_deref().is_some_and(|id| id.chars().count() > KEYCLOAK_ID_MAX_CHARS) {
            errors.push(
                Field::KeycloakId,
                format!("Identificador externo deve ter no máximo {KEYCLOAK_ID_MAX_CHARS} caracteres"),
            );
        }
        errors.into_result()
    }

    /// Trim the text fields and lowercase the email's domain.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            email: normalize_email(&self.email),
            full_name: self.full_name.trim().to_owned(),
            keycloak_id: self.keycloak_id.map(|id| id.trim().to_owned()).filter(|id| !id.is_empty()),
        }
    }
}

impl UserUpdate {
    /// # Errors
    ///
    /// Returns every rule the present fields break.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if let Some(full_name) = &self.full_name {
            check_full_name(&mut errors, full_name);
        }
        errors.into_result()
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self { full_name: self.full_name.map(|n| n.trim().to_owned()), ..self }
    }

    /// Apply the present fields to `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(full_name) = &self.full_name {
            user.full_name.clone_from(full_name);
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

fn check_full_name(errors: &mut ValidationError, full_name: &str) {
    let len = full_name.trim().chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(Field::FullName, format!("Nome deve ter pelo menos {NAME_MIN_CHARS} caracteres"));
    } else if len > FULL_NAME_MAX_CHARS {
        errors.push(Field::FullName, format!("Nome deve ter no máximo {FULL_NAME_MAX_CHARS} caracteres"));
    }
}

fn check_email(errors: &mut ValidationError, email: &str) {
    let email = email.trim();
    if email.chars().count() > EMAIL_MAX_CHARS {
        errors.push(Field::Email, format!("Email deve ter no máximo {EMAIL_MAX_CHARS} caracteres"));
    } else if !is_plausible_email(email) {
        errors.push(Field::Email, "Email inválido");
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}
