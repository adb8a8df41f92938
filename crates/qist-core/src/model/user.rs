use crate::types::EntityId;
use serde::{Deserialize, Serialize};

///
/// User
///
/// The signed-in administrator. A single session-wide value, not a
/// collection row.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub name: String,
}

impl User {
    /// Derive the session user for `username`, mailing at `email_domain`.
    #[must_use]
    pub fn for_username(username: &str, email_domain: &str) -> Self {
        Self {
            id: EntityId::MIN,
            username: username.to_string(),
            email: format!("{username}@{email_domain}"),
            name: capitalize(username),
        }
    }
}

// Upper-case the first character only; the rest is left as typed.
fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

///
/// TESTS
///
