//! Nellet data models

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Profile picture used when the client does not provide one
pub const DEFAULT_PROFILE_PICTURE: &str = "http://www.quickmeme.com/img/4d/4d56e45853983bfeedced94719e78b2869e21252c3d85105f7b56320b8f959ab.jpg";

/// Registration payload as sent by the identity provider's profile
///
/// Every field is optional. Missing profile fields are stored as `false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Subject identifier; becomes the user id when present
    pub sub: Option<String>,
    /// Email address
    pub email: Option<Value>,
    /// Avatar URL
    pub profile_picture: Option<Value>,
    /// First name
    pub given_name: Option<Value>,
    /// Last name
    pub family_name: Option<Value>,
    /// Preference object
    pub preferences: Option<Value>,
    /// Last profile update timestamp
    #[serde(rename = "updated_at")]
    pub updated_at: Option<Value>,
}

/// A stored Nellet user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NelletUser {
    /// Unique identifier
    pub id: String,
    /// Email address, or `false`
    pub email: Value,
    /// Avatar URL
    pub profile_picture: Value,
    /// First name, or `false`
    pub given_name: Value,
    /// Last name, or `false`
    pub family_name: Value,
    /// Preference object
    pub preferences: Value,
    /// Last profile update timestamp, or `false`
    pub last_modified: Value,
}

/// Preferences stored for a user who registers without any
pub fn default_preferences() -> Value {
    json!({ "darkMode": false })
}

impl From<RegisterRequest> for NelletUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            id: request.sub.unwrap_or_else(|| Uuid::new_v4().to_string()),
            email: request.email.unwrap_or(Value::Bool(false)),
            profile_picture: request
                .profile_picture
                .unwrap_or_else(|| Value::String(DEFAULT_PROFILE_PICTURE.to_string())),
            given_name: request.given_name.unwrap_or(Value::Bool(false)),
            family_name: request.family_name.unwrap_or(Value::Bool(false)),
            preferences: request.preferences.unwrap_or_else(default_preferences),
            last_modified: request.updated_at.unwrap_or(Value::Bool(false)),
        }
    }
}
