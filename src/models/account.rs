use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub email: String,
    pub username: String,
    /// Accounts start deactivated until confirmed
    pub activated: bool,
}

/// Registration request body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewAccount {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

impl NewAccount {
    /// Per-field validation messages. Empty when the request is valid.
    pub fn field_errors(&self) -> BTreeMap<&'static str, &'static str> {
        let mut errors = BTreeMap::new();

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "The email is required.");
        } else if !is_plausible_email(email) {
            errors.insert("email", "The email is not valid.");
        }

        if self.username.trim().is_empty() {
            errors.insert("username", "The user name is blank.");
        }

        errors
    }

    /// Build the stored account. Emails are compared case-insensitively.
    pub fn into_account(self) -> Account {
        Account {
            email: normalize_email(&self.email),
            username: self.username.trim().to_string(),
            activated: false,
        }
    }
}

/// Key under which an account is stored
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}
