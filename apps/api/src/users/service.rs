//! User operations: first-sight sync, lookup, and the Pro upgrade.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::Identity;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::users::store::UserStore;

/// Records a user the first time they are seen. Later calls are no-ops;
/// email and name keep their first-sync values.
///
/// Returns whether a record was created.
pub async fn sync_user(
    store: &dyn UserStore,
    external_id: &str,
    email: &str,
    name: &str,
) -> Result<bool, AppError> {
    if external_id.trim().is_empty() {
        return Err(AppError::Validation("userId cannot be empty".to_string()));
    }

    let created = store
        .insert_if_absent(&NewUser {
            external_id: external_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
        })
        .await?;

    if created {
        info!("Created user record for {external_id}");
    } else {
        debug!("User {external_id} already synced");
    }
    Ok(created)
}

/// Returns the record for `external_id`, or `None` for a blank or unknown id.
pub async fn get_user(store: &dyn UserStore, external_id: &str) -> Result<Option<User>, AppError> {
    if external_id.trim().is_empty() {
        return Ok(None);
    }
    store.find_by_external_id(external_id).await
}

/// Returns the caller's own record.
pub async fn current_user(
    store: &dyn UserStore,
    identity: Option<&Identity>,
) -> Result<User, AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    store
        .find_by_external_id(&identity.subject)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Flags the caller's record as Pro and stamps `pro_since = now`.
///
/// The identity comes from the verified session, never from request input,
/// so a caller can only upgrade their own record.
pub async fn upgrade_to_pro(
    store: &dyn UserStore,
    identity: Option<&Identity>,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;

    let user = store
        .mark_pro(&identity.subject, now)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!("Upgraded {} to Pro", identity.subject);
    Ok(user)
}
