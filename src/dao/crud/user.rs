use serde_json::Value;
use tracing::{debug, info};

use crate::{
    dao::{
        models::{NewUser, UserFields, UserRecord},
        patch::{Patch, PatchError},
        storage::{Filter, StorageError, StorageHandle},
    },
    security,
};

use super::{CrudBase, CrudResult};

/// Update key carrying a plaintext password; never stored as such.
const PASSWORD_FIELD: &str = "password";
const HASHED_PASSWORD_FIELD: &str = "hashed_password";

/// CRUD engine for user accounts: hashes passwords and looks users up by email.
#[derive(Clone)]
pub struct UserCrud<H> {
    base: CrudBase<H>,
}

impl<H> UserCrud<H>
where
    H: StorageHandle<Id = i32, Fields = UserFields>,
{
    pub fn new(handle: H) -> Self {
        Self {
            base: CrudBase::new(handle),
        }
    }

    /// Generic engine underneath.
    pub fn base(&self) -> &CrudBase<H> {
        &self.base
    }

    pub async fn get(&self, id: i32) -> CrudResult<Option<UserRecord>> {
        self.base.get(id).await
    }

    pub async fn get_multi(&self, skip: u64, limit: u64) -> CrudResult<Vec<UserRecord>> {
        self.base.get_multi(skip, limit).await
    }

    /// Find the account registered under `email`.
    pub async fn get_by_email(&self, email: &str) -> CrudResult<Option<UserRecord>> {
        let mut found = self
            .base
            .get_multi_filtered(Some(Filter::eq("email", email)), 0, 1)
            .await?;
        Ok(found.pop())
    }

    /// Register a new account, storing only the hash of its password.
    pub async fn create(&self, new_user: NewUser) -> CrudResult<UserRecord> {
        if self.get_by_email(&new_user.email).await?.is_some() {
            return Err(StorageError::conflict(format!(
                "a user with email `{}` already exists",
                new_user.email
            ))
            .into());
        }

        let fields = UserFields {
            hashed_password: security::hash_password(&new_user.password).await?,
            email: new_user.email,
            full_name: new_user.full_name,
            is_active: new_user.is_active,
            is_superuser: new_user.is_superuser,
        };
        let record = self.base.insert_fields(fields).await?;
        info!(user_id = record.id, "registered user");
        Ok(record)
    }

    /// Apply an update; a `password` entry is hashed into `hashed_password`.
    pub async fn update(&self, existing: UserRecord, mut patch: Patch<UserFields>) -> CrudResult<UserRecord> {
        if patch.contains(HASHED_PASSWORD_FIELD) {
            return Err(PatchError::UnknownField(HASHED_PASSWORD_FIELD.to_owned()).into());
        }
        if let Some(raw) = patch.take(PASSWORD_FIELD) {
            let plaintext: String =
                serde_json::from_value(raw).map_err(|source| PatchError::InvalidValue { source })?;
            let hashed = security::hash_password(&plaintext).await?;
            patch.insert(HASHED_PASSWORD_FIELD, Value::String(hashed));
            debug!(user_id = existing.id, "password changed");
        }
        self.base.update(existing, &patch).await
    }

    /// Return the account when `password` matches, `None` otherwise.
    ///
    /// Unknown emails still pay for a password verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> CrudResult<Option<UserRecord>> {
        let user = self.get_by_email(email).await?;
        let hashed = user.as_ref().map(|user| user.fields.hashed_password.as_str());
        if !security::verify_password(password, hashed).await? {
            return Ok(None);
        }
        Ok(user)
    }

    /// Inactive accounts may not authenticate.
    pub fn is_active(&self, user: &UserRecord) -> bool {
        user.fields.is_active
    }

    pub fn is_superuser(&self, user: &UserRecord) -> bool {
        user.fields.is_superuser
    }
}
