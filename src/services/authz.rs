//! Authorization gate applied before any read or write of a protected record.
//!
//! A caller may touch an owned record when they are a superuser or its owner.
//! Refusals carry a generic message so they never reveal who owns a record.

use tracing::warn;

use crate::{
    dao::models::{Owned, UserRecord},
    error::ServiceError,
};

const REFUSAL: &str = "not enough permissions";

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub is_superuser: bool,
}

impl From<&UserRecord> for Principal {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            is_superuser: user.fields.is_superuser,
        }
    }
}

/// Which records a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    OwnedBy(i32),
}

/// Superusers list everything, everyone else only their own records.
pub fn list_scope(principal: &Principal) -> ListScope {
    if principal.is_superuser {
        ListScope::All
    } else {
        ListScope::OwnedBy(principal.id)
    }
}

/// Allow superusers and the record owner.
pub fn ensure_can_access<F: Owned>(principal: &Principal, record: &F) -> Result<(), ServiceError> {
    if principal.is_superuser || record.owner_id() == principal.id {
        return Ok(());
    }
    warn!(principal = principal.id, "refused access to a record owned by another user");
    Err(ServiceError::Forbidden(REFUSAL.into()))
}

/// Allow superusers and the account holder.
pub fn ensure_self_or_superuser(principal: &Principal, user_id: i32) -> Result<(), ServiceError> {
    if principal.is_superuser || principal.id == user_id {
        return Ok(());
    }
    warn!(principal = principal.id, "refused access to another account");
    Err(ServiceError::Forbidden(REFUSAL.into()))
}

/// Allow superusers only.
pub fn ensure_superuser(principal: &Principal) -> Result<(), ServiceError> {
    if principal.is_superuser {
        return Ok(());
    }
    warn!(principal = principal.id, "refused superuser-only operation");
    Err(ServiceError::Forbidden("the user doesn't have enough privileges".into()))
}
