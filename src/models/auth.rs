use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::id;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Creator,
    Shopper,
    Brand,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Creator => "Creator",
            Role::Shopper => "Shopper",
            Role::Brand => "Brand",
            Role::Unknown => "Unknown",
        }
    }
}

/// Profile of the signed-in user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "_id", deserialize_with = "id::optional", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    /// Set for `brand` users: the brand their portal shows
    #[serde(default, deserialize_with = "id::optional", skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone().unwrap_or_else(|| "Account".to_string())
        } else {
            full
        }
    }
}

/// Permission set as sent by the API: feature name -> grant
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub Map<String, Value>);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
    #[serde(default)]
    pub user_permissions: Option<Permissions>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_parses_token_user_and_permissions() {
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "jwt-abc",
            "user": {"id": 9, "email": "a@b.com", "role": "admin", "locale": "en"},
            "userPermissions": {"brands": true, "looks": ["read"], "ads": false}
        }))
        .unwrap();

        assert_eq!(response.token, "jwt-abc");
        assert_eq!(response.user.id.as_deref(), Some("9"));
        assert_eq!(response.user.role, Some(Role::Admin));
        assert_eq!(response.user.extra.get("locale"), Some(&json!("en")));

        let permissions = response.user_permissions.unwrap();
        assert_eq!(permissions.0.get("brands"), Some(&json!(true)));
        assert_eq!(permissions.0.get("looks"), Some(&json!(["read"])));
        assert_eq!(permissions.0.get("ads"), Some(&json!(false)));
        assert_eq!(permissions.0.get("users"), None);
    }

    #[test]
    fn unknown_roles_do_not_fail_parsing() {
        let profile: UserProfile = serde_json::from_value(json!({"role": "superuser"})).unwrap();
        assert_eq!(profile.role, Some(Role::Unknown));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let profile: UserProfile =
            serde_json::from_value(json!({"firstName": "Ada", "lastName": "Lovelace"})).unwrap();
        assert_eq!(profile.display_name(), "Ada Lovelace");

        let profile: UserProfile = serde_json::from_value(json!({"email": "a@b.com"})).unwrap();
        assert_eq!(profile.display_name(), "a@b.com");
    }
}
