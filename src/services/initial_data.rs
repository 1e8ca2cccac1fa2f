//! Startup data seeding.

use tracing::{info, warn};

use crate::{
    config::FirstSuperuser,
    dao::models::NewUser,
    error::ServiceError,
    state::SharedState,
};

/// Create the configured first superuser unless an account already uses its email.
pub async fn ensure_first_superuser(state: &SharedState) -> Result<(), ServiceError> {
    let Some(FirstSuperuser { email, password }) = state.config().first_superuser.clone() else {
        info!("no first superuser configured");
        return Ok(());
    };

    if let Some(existing) = state.users().get_by_email(&email).await? {
        if !state.users().is_superuser(&existing) {
            warn!(user_id = existing.id, "first superuser email belongs to a regular account");
        }
        return Ok(());
    }

    let new_user = NewUser {
        is_superuser: true,
        ..NewUser::new(email, password)
    };
    let record = state.users().create(new_user).await?;
    info!(user_id = record.id, "created first superuser");
    Ok(())
}
