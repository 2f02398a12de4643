//! Role and ownership checks for user-management routes.
//!
//! The caller's role is always read from storage rather than trusted from the
//! token, so a demotion takes effect on the next request.

use sqlx::PgPool;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    ListAll,
    Create,
    View(i64),
    Update(i64),
    Delete(i64),
}

/// Decide whether `caller_id` holding `role` may perform `action`.
pub fn authorize(caller_id: i64, role: Role, action: UserAction) -> Result<(), AppError> {
    match action {
        UserAction::ListAll | UserAction::Create | UserAction::Delete(_) => match role {
            Role::Admin => Ok(()),
            Role::User => Err(AppError::Forbidden(
                "Access denied: administrators only".to_string(),
            )),
        },
        UserAction::View(target) | UserAction::Update(target) => match role {
            Role::Admin => Ok(()),
            Role::User if target == caller_id => Ok(()),
            Role::User => Err(AppError::Forbidden(
                "Access denied: you can only access your own profile".to_string(),
            )),
        },
    }
}

/// Role the update should actually write. Non-admins cannot change roles; the
/// request is not rejected, the field is just dropped.
pub fn permitted_role_change(caller_role: Role, requested: Option<Role>) -> Option<Role> {
    match caller_role {
        Role::Admin => requested,
        Role::User => None,
    }
}

pub fn forbid_self_delete(caller_id: i64, target: i64) -> Result<(), AppError> {
    if caller_id == target {
        return Err(AppError::InvalidOperation(
            "You cannot delete your own account".to_string(),
        ));
    }
    Ok(())
}

pub async fn caller_role(pool: &PgPool, auth: &AuthUser) -> Result<Role, AppError> {
    db::users::find_role(pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Access denied".to_string()))
}

/// Fetch the caller's role and check it against `action`. Returns the role for
/// follow-up decisions such as [`permitted_role_change`].
pub async fn require(pool: &PgPool, auth: &AuthUser, action: UserAction) -> Result<Role, AppError> {
    let role = caller_role(pool, auth).await?;
    authorize(auth.user_id, role, action)?;
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_list_create_and_delete() {
        for action in [UserAction::ListAll, UserAction::Create, UserAction::Delete(9)] {
            assert!(authorize(1, Role::Admin, action).is_ok());
            assert!(matches!(
                authorize(1, Role::User, action),
                Err(AppError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn users_reach_only_their_own_record() {
        assert!(authorize(5, Role::User, UserAction::View(5)).is_ok());
        assert!(authorize(5, Role::User, UserAction::Update(5)).is_ok());
        assert!(authorize(5, Role::User, UserAction::View(6)).is_err());
        assert!(authorize(5, Role::User, UserAction::Update(6)).is_err());
        assert!(authorize(5, Role::Admin, UserAction::Update(6)).is_ok());
    }

    #[test]
    fn role_change_dropped_for_non_admins() {
        assert_eq!(permitted_role_change(Role::User, Some(Role::Admin)), None);
        assert_eq!(
            permitted_role_change(Role::Admin, Some(Role::User)),
            Some(Role::User)
        );
        assert_eq!(permitted_role_change(Role::Admin, None), None);
    }

    #[test]
    fn self_delete_is_invalid_even_for_admins() {
        assert!(matches!(
            forbid_self_delete(3, 3),
            Err(AppError::InvalidOperation(_))
        ));
        assert!(forbid_self_delete(3, 4).is_ok());
    }
}
