//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }

    /// Parse a role claim; anything unrecognised is treated as a customer
    pub fn from_claim(role: &str) -> Self {
        match role {
            "admin" => UserRole::Admin,
            _ => UserRole::Customer,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public user profile (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Customer row for the admin user list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerOverview {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub order_count: i64,
}

/// Registration payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Login payload; `username` is accepted as an alias for `email`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn identifier(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// User fields returned alongside a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.full_name(),
            phone: user.phone.clone(),
            role: user.role,
        }
    }
}

/// Token issuance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

/// Admin creation payload; `name` is split into first/last
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminCreate {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Password reset payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordReset {
    pub password: String,
}

/// Split a display name into (first, last) on the first whitespace
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Ada Lovelace"), ("Ada".into(), "Lovelace".into()));
        assert_eq!(
            split_name("  Mary Ann  Evans "),
            ("Mary".into(), "Ann  Evans".into())
        );
        assert_eq!(split_name("Plato"), ("Plato".into(), String::new()));
    }

    #[test]
    fn test_login_identifier_prefers_email() {
        let req = LoginRequest {
            email: Some("a@b.co".into()),
            username: Some("other@b.co".into()),
            password: "x".into(),
        };
        assert_eq!(req.identifier(), Some("a@b.co"));

        let req = LoginRequest {
            email: None,
            username: Some(" u@b.co ".into()),
            password: "x".into(),
        };
        assert_eq!(req.identifier(), Some("u@b.co"));

        assert_eq!(LoginRequest::default().identifier(), None);
    }

    #[test]
    fn test_role_claim_parsing() {
        assert_eq!(UserRole::from_claim("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("customer"), UserRole::Customer);
        assert_eq!(UserRole::from_claim("root"), UserRole::Customer);
    }
}
