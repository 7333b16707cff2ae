//! Role and profile resolution for callers.

use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Caller, Principal, UserProfile, UserRole};

/// Anonymous callers are guests and the deployment owner is always admin.
/// Everyone else gets their assigned role, or `user` when unassigned.
pub fn resolve_role(
    conn: &Connection,
    owner: Option<&Principal>,
    caller: &Caller,
) -> anyhow::Result<UserRole> {
    let Some(principal) = caller.principal() else {
        return Ok(UserRole::Guest);
    };
    if owner == Some(principal) {
        return Ok(UserRole::Admin);
    }
    Ok(queries::get_assigned_role(conn, principal)?.unwrap_or(UserRole::User))
}

pub fn is_admin(conn: &Connection, owner: Option<&Principal>, caller: &Caller) -> anyhow::Result<bool> {
    Ok(resolve_role(conn, owner, caller)? == UserRole::Admin)
}

pub fn assign_role(
    conn: &Connection,
    owner: Option<&Principal>,
    principal: &Principal,
    role: UserRole,
) -> anyhow::Result<()> {
    if owner == Some(principal) && role != UserRole::Admin {
        tracing::warn!(%principal, role = role.as_str(), "owner stays admin regardless of assignment");
    }
    queries::assign_role(conn, principal, role)?;
    tracing::info!(%principal, role = role.as_str(), "role assigned");
    Ok(())
}

pub fn caller_profile(conn: &Connection, caller: &Caller) -> anyhow::Result<Option<UserProfile>> {
    match caller.principal() {
        Some(principal) => queries::get_profile(conn, principal),
        None => Ok(None),
    }
}

pub fn user_profile(conn: &Connection, principal: &Principal) -> anyhow::Result<Option<UserProfile>> {
    queries::get_profile(conn, principal)
}

/// Creates or fully replaces the profile of `principal`.
pub fn save_profile(conn: &Connection, principal: &Principal, profile: &UserProfile) -> anyhow::Result<()> {
    queries::save_profile(conn, principal, profile)?;
    tracing::debug!(%principal, "profile saved");
    Ok(())
}

/// Names are not unique; the identity that first saved a matching profile wins.
pub fn principal_by_name(conn: &Connection, name: &str) -> anyhow::Result<Option<Principal>> {
    queries::find_principal_by_name(conn, name)
}
