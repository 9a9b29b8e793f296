use serde::{Deserialize, Serialize};

/// Role value the backend assigns to administrators and above.
pub const ROLE_ADMIN: i64 = 10;

/// The signed-in user's account summary from `/api/user/self`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: i64,
    /// Remaining balance in quota units
    #[serde(default)]
    pub quota: f64,
    /// Lifetime consumption in quota units
    #[serde(default)]
    pub used_quota: f64,
    #[serde(default)]
    pub request_count: i64,
    #[serde(default)]
    pub group: String,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role >= ROLE_ADMIN
    }
}
