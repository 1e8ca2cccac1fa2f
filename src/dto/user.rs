//! Account payloads. Responses never expose the password hash.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{NewUser, UserRecord};

/// Account creation by a superuser.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UserCreate {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl From<UserCreate> for NewUser {
    fn from(value: UserCreate) -> Self {
        Self {
            email: value.email,
            password: value.password,
            full_name: value.full_name,
            is_active: value.is_active,
            is_superuser: value.is_superuser,
        }
    }
}

/// Anonymous sign-up; always creates an active, non-privileged account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UserRegister {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl From<UserRegister> for NewUser {
    fn from(value: UserRegister) -> Self {
        Self {
            full_name: value.full_name,
            ..NewUser::new(value.email, value.password)
        }
    }
}

/// Partial account update by a superuser.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub password: Option<String>,
    /// Absent keeps the name, `null` clears it.
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub full_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

/// Partial update of the caller's own account; privilege flags are not accepted.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserUpdateMe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub password: Option<String>,
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub full_name: Option<Option<String>>,
}

/// Public projection of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id,
            email: value.fields.email,
            full_name: value.fields.full_name,
            is_active: value.fields.is_active,
            is_superuser: value.fields.is_superuser,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{models::UserFields, patch::Patch};
    use serde_json::{Value, json};

    #[test]
    fn test_update_distinguishes_absent_and_null_names() {
        let absent: UserUpdate = serde_json::from_value(json!({ "is_active": false })).unwrap();
        assert_eq!(absent.full_name, None);
        let patch = Patch::<UserFields>::from_update(&absent).unwrap();
        assert!(!patch.contains("full_name"));
        assert_eq!(patch.get("is_active"), Some(&Value::Bool(false)));

        let cleared: UserUpdate = serde_json::from_value(json!({ "full_name": null })).unwrap();
        assert_eq!(cleared.full_name, Some(None));
        let patch = Patch::<UserFields>::from_update(&cleared).unwrap();
        assert_eq!(patch.get("full_name"), Some(&Value::Null));
    }

    #[test]
    fn test_create_requires_a_valid_email() {
        let payload: UserCreate =
            serde_json::from_value(json!({ "email": "not-an-email", "password": "secret" })).unwrap();
        assert!(payload.validate().is_err());
        assert!(payload.is_active);
        assert!(!payload.is_superuser);
    }
}
