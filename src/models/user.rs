//! Identity of the signed-in user, as forwarded by the account gateway.

use serde::{Deserialize, Serialize};

/// Domain appended to bare user names by the account service.
pub const DEFAULT_EMAIL_DOMAIN: &str = "mail.com";

/// Collection holding user profile documents.
pub const USERS_COLLECTION: &str = "users";

/// The caller on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl Identity {
    pub fn new(username: &str, is_admin: bool) -> Self {
        Self {
            email: to_email_address(username),
            display_name: None,
            is_admin,
        }
    }

    /// Whether this user may edit or delete a recipe written by `author`.
    pub fn can_modify(&self, author: &str) -> bool {
        self.is_admin || self.email == author
    }
}

/// Profile document stored in the `users` collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// Normalize a user name the way accounts are keyed: lower-cased, bare names
/// get the default mail domain.
pub fn to_email_address(username: &str) -> String {
    let lower = username.trim().to_lowercase();
    if looks_like_email(&lower) {
        lower
    } else {
        format!("{}@{}", lower, DEFAULT_EMAIL_DOMAIN)
    }
}

/// Loose `x@y.z` check: some whitespace-free run must hold an `@` with text
/// before it and a dotted part after it.
fn looks_like_email(s: &str) -> bool {
    s.split_whitespace().any(|token| {
        token.char_indices().any(|(at, c)| {
            c == '@' && at > 0 && {
                let domain = &token[at + 1..];
                domain
                    .char_indices()
                    .any(|(dot, d)| d == '.' && dot > 0 && dot + 1 < domain.len())
            }
        })
    })
}
