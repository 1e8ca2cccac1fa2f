use tracing::{info, warn};

use crate::{
    dao::{
        id::RecordId,
        models::{NewUser, UserRecord},
        patch::Patch,
    },
    dto::{
        pagination::PageParams,
        user::{UserCreate, UserRegister, UserResponse, UserUpdate, UserUpdateMe},
    },
    error::ServiceError,
    services::authz::{self, Principal},
    state::SharedState,
};

pub async fn list_users(state: &SharedState, page: PageParams) -> Result<Vec<UserResponse>, ServiceError> {
    let users = state.users().get_multi(page.skip, page.limit).await?;
    Ok(users.into_iter().map(Into::into).collect())
}

/// Create an account on behalf of a superuser.
pub async fn create_user(state: &SharedState, payload: UserCreate) -> Result<UserResponse, ServiceError> {
    let record = state.users().create(NewUser::from(payload)).await.map_err(|err| {
        let err = ServiceError::from(err);
        if matches!(err, ServiceError::Conflict(_)) {
            warn!("rejected account creation for an email already in use");
        }
        err
    })?;
    Ok(record.into())
}

/// Anonymous sign-up, only when open registration is enabled.
pub async fn register_user(state: &SharedState, payload: UserRegister) -> Result<UserResponse, ServiceError> {
    if !state.config().users_open_registration {
        return Err(ServiceError::Forbidden(
            "open user registration is forbidden on this server".into(),
        ));
    }
    let record = state.users().create(NewUser::from(payload)).await?;
    info!(user_id = record.id, "user registered through open registration");
    Ok(record.into())
}

/// Update the caller's own account.
pub async fn update_me(
    state: &SharedState,
    current: UserRecord,
    payload: UserUpdateMe,
) -> Result<UserResponse, ServiceError> {
    let patch = Patch::from_update(&payload).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let updated = state.users().update(current, patch).await?;
    Ok(updated.into())
}

/// Read an account; callers may read themselves, superusers anyone.
pub async fn get_user(state: &SharedState, principal: &Principal, raw_id: &str) -> Result<UserResponse, ServiceError> {
    let user = load_user(state, raw_id).await?;
    authz::ensure_self_or_superuser(principal, user.id)?;
    Ok(user.into())
}

/// Update any account; superusers only.
pub async fn update_user(state: &SharedState, raw_id: &str, payload: UserUpdate) -> Result<UserResponse, ServiceError> {
    let existing = load_user(state, raw_id).await?;
    let patch = Patch::from_update(&payload).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let updated = state.users().update(existing, patch).await?;
    Ok(updated.into())
}

async fn load_user(state: &SharedState, raw_id: &str) -> Result<UserRecord, ServiceError> {
    let id = <i32 as RecordId>::parse(raw_id)?;
    state
        .users()
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user `{id}`")))
}
