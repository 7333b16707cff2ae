//! Per-operation access policy.
//!
//! The decision depends only on the caller, the operation and the current role
//! map. Handlers authorize while holding the database lock and before touching
//! the store, so a rejected call never performs partial work. Guest-level
//! operations that never touch the store skip the lock entirely.

use std::fmt;

use rusqlite::Connection;

use crate::errors::AppError;
use crate::models::{Caller, Principal, UserRole};
use crate::services::identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SubmitBooking,
    GetBookingStatusById,
    GetBookingsByPhone,
    SearchBookings,
    ListVehicles,
    IsCallerAdmin,
    GetCallerUserProfile,
    SaveCallerUserProfile,
    GetCallerUserRole,
    GetAllBookingsForAdmin,
    UpdateBookingStatus,
    DeleteBooking,
    AssignCallerUserRole,
    GetUserProfile,
    GetUserIdByName,
    GetBookingStats,
}

impl Operation {
    pub fn min_role(self) -> UserRole {
        match self {
            Operation::SubmitBooking
            | Operation::GetBookingStatusById
            | Operation::GetBookingsByPhone
            | Operation::SearchBookings
            | Operation::ListVehicles
            | Operation::IsCallerAdmin => UserRole::Guest,

            Operation::GetCallerUserProfile
            | Operation::SaveCallerUserProfile
            | Operation::GetCallerUserRole => UserRole::User,

            Operation::GetAllBookingsForAdmin
            | Operation::UpdateBookingStatus
            | Operation::DeleteBooking
            | Operation::AssignCallerUserRole
            | Operation::GetUserProfile
            | Operation::GetUserIdByName
            | Operation::GetBookingStats => UserRole::Admin,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::SubmitBooking => "submitBooking",
            Operation::GetBookingStatusById => "getBookingStatusById",
            Operation::GetBookingsByPhone => "getBookingsByPhone",
            Operation::SearchBookings => "searchBookings",
            Operation::ListVehicles => "listVehicles",
            Operation::IsCallerAdmin => "isCallerAdmin",
            Operation::GetCallerUserProfile => "getCallerUserProfile",
            Operation::SaveCallerUserProfile => "saveCallerUserProfile",
            Operation::GetCallerUserRole => "getCallerUserRole",
            Operation::GetAllBookingsForAdmin => "getAllBookingsForAdmin",
            Operation::UpdateBookingStatus => "updateBookingStatus",
            Operation::DeleteBooking => "deleteBooking",
            Operation::AssignCallerUserRole => "assignCallerUserRole",
            Operation::GetUserProfile => "getUserProfile",
            Operation::GetUserIdByName => "getUserIdByName",
            Operation::GetBookingStats => "getBookingStats",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure policy check against an already resolved role.
pub fn check(operation: Operation, role: UserRole) -> Result<(), AppError> {
    let required = operation.min_role();
    if role.satisfies(required) {
        Ok(())
    } else {
        Err(AppError::Unauthorized { operation, required })
    }
}

/// Resolves the caller's role and checks it against `operation`.
pub fn authorize(
    conn: &Connection,
    owner: Option<&Principal>,
    caller: &Caller,
    operation: Operation,
) -> Result<UserRole, AppError> {
    let role = identity::resolve_role(conn, owner, caller)?;
    if let Err(err) = check(operation, role) {
        tracing::warn!(
            caller = %caller,
            role = role.as_str(),
            operation = operation.as_str(),
            "operation rejected"
        );
        return Err(err);
    }
    Ok(role)
}

/// Decides a guest-level operation without the role map. Every role
/// satisfies `guest`, so the caller's actual role cannot change the outcome;
/// anything stricter is refused here and must go through [`authorize`].
pub fn authorize_public(caller: &Caller, operation: Operation) -> Result<(), AppError> {
    if let Err(err) = check(operation, UserRole::Guest) {
        tracing::warn!(
            caller = %caller,
            operation = operation.as_str(),
            "operation is not public"
        );
        return Err(err);
    }
    Ok(())
}

/// Like [`authorize`], for operations keyed on the caller's own identity.
pub fn authorize_principal<'a>(
    conn: &Connection,
    owner: Option<&Principal>,
    caller: &'a Caller,
    operation: Operation,
) -> Result<&'a Principal, AppError> {
    authorize(conn, owner, caller, operation)?;
    caller.principal().ok_or(AppError::Unauthorized {
        operation,
        required: UserRole::User,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_policy_table() {
        assert!(check(Operation::SubmitBooking, UserRole::Guest).is_ok());
        assert!(check(Operation::GetBookingsByPhone, UserRole::Guest).is_ok());
        assert!(check(Operation::GetBookingStatusById, UserRole::Guest).is_ok());

        assert!(check(Operation::GetCallerUserRole, UserRole::Guest).is_err());
        assert!(check(Operation::SaveCallerUserProfile, UserRole::User).is_ok());

        for op in [
            Operation::GetAllBookingsForAdmin,
            Operation::UpdateBookingStatus,
            Operation::DeleteBooking,
            Operation::AssignCallerUserRole,
            Operation::GetUserProfile,
            Operation::GetUserIdByName,
            Operation::GetBookingStats,
        ] {
            assert!(check(op, UserRole::Guest).is_err(), "{op}");
            assert!(check(op, UserRole::User).is_err(), "{op}");
            assert!(check(op, UserRole::Admin).is_ok(), "{op}");
        }
    }

    #[test]
    fn test_authorize_public_only_admits_guest_operations() {
        let caller = Caller::Authenticated(Principal::parse("rider").unwrap());
        assert!(authorize_public(&Caller::Anonymous, Operation::ListVehicles).is_ok());
        assert!(authorize_public(&caller, Operation::ListVehicles).is_ok());
        assert!(authorize_public(&caller, Operation::GetBookingStats).is_err());
        assert!(authorize_public(&Caller::Anonymous, Operation::GetCallerUserRole).is_err());
    }

    #[test]
    fn test_guest_rejected_for_admin_listing() {
        let conn = db::init_db(":memory:").unwrap();
        let err = authorize(&conn, None, &Caller::Anonymous, Operation::GetAllBookingsForAdmin).unwrap_err();
        assert!(matches!(
            err,
            AppError::Unauthorized {
                operation: Operation::GetAllBookingsForAdmin,
                required: UserRole::Admin,
            }
        ));
    }

    #[test]
    fn test_owner_authorized_for_admin_operations() {
        let conn = db::init_db(":memory:").unwrap();
        let owner = Principal::parse("owner").unwrap();
        let caller = Caller::Authenticated(owner.clone());
        let role = authorize(&conn, Some(&owner), &caller, Operation::DeleteBooking).unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_authorize_principal_requires_identity() {
        let conn = db::init_db(":memory:").unwrap();
        let caller = Caller::Authenticated(Principal::parse("rider").unwrap());
        let principal = authorize_principal(&conn, None, &caller, Operation::GetCallerUserProfile).unwrap();
        assert_eq!(principal.as_str(), "rider");

        assert!(authorize_principal(&conn, None, &Caller::Anonymous, Operation::GetCallerUserProfile).is_err());
    }
}
