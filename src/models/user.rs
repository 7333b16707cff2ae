use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Principals are non-empty and contain no whitespace or control
    /// characters. Anything else is rejected rather than normalized.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return None;
        }
        Some(Principal(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who issued a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

impl Caller {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated(p) => Some(p),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Anonymous => f.write_str("anonymous"),
            Caller::Authenticated(p) => write!(f, "{p}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            "guest" => Some(UserRole::Guest),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            UserRole::Guest => 0,
            UserRole::User => 1,
            UserRole::Admin => 2,
        }
    }

    /// Whether this role meets `required`. Roles are totally ordered
    /// guest < user < admin.
    pub fn satisfies(&self, required: UserRole) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(UserRole::Admin.satisfies(UserRole::User));
        assert!(UserRole::User.satisfies(UserRole::Guest));
        assert!(UserRole::Guest.satisfies(UserRole::Guest));
        assert!(!UserRole::User.satisfies(UserRole::Admin));
        assert!(!UserRole::Guest.satisfies(UserRole::User));
    }

    #[test]
    fn test_principal_rejects_whitespace() {
        assert!(Principal::parse("rider-42").is_some());
        assert!(Principal::parse("").is_none());
        assert!(Principal::parse("two words").is_none());
    }
}
