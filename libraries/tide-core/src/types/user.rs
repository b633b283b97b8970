/// User domain type
use serde::{Deserialize, Serialize};

/// Role of a user account
///
/// A single concrete record carries the role as data; role-specific
/// operations dispatch with a `match` instead of a class hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular listener
    Regular,
    /// Artist (owns albums)
    Artist,
    /// Host (owns podcasts)
    Host,
}

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique username
    pub username: String,

    /// Age
    pub age: u32,

    /// City
    pub city: String,

    /// Account role
    pub role: UserRole,

    /// Connection status; offline users' engines are frozen in place
    pub online: bool,
}

impl User {
    /// Create a new online regular user
    pub fn new(username: impl Into<String>, age: u32, city: impl Into<String>) -> Self {
        Self::with_role(username, age, city, UserRole::Regular)
    }

    /// Create a new online user with a specific role
    pub fn with_role(
        username: impl Into<String>,
        age: u32,
        city: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            username: username.into(),
            age,
            city: city.into(),
            role,
            online: true,
        }
    }

    /// Flip the connection status
    pub fn switch_connection_status(&mut self) {
        self.online = !self.online;
    }
}
