//! Editor-request workflow and role administration rules.
//!
//! Every check here is a pure function over the actor's and target's
//! current state. The API loads both users, calls the check, then persists
//! the returned outcome.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Editor status
// ---------------------------------------------------------------------------

pub const EDITOR_STATUS_PENDING: &str = "pending";
pub const EDITOR_STATUS_APPROVED: &str = "approved";
pub const EDITOR_STATUS_REJECTED: &str = "rejected";

/// Progress of a user's request to become an editor. `None` in storage
/// means no request was ever made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorStatus {
    Pending,
    Approved,
    Rejected,
}

impl EditorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorStatus::Pending => EDITOR_STATUS_PENDING,
            EditorStatus::Approved => EDITOR_STATUS_APPROVED,
            EditorStatus::Rejected => EDITOR_STATUS_REJECTED,
        }
    }
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EDITOR_STATUS_PENDING => Ok(EditorStatus::Pending),
            EDITOR_STATUS_APPROVED => Ok(EditorStatus::Approved),
            EDITOR_STATUS_REJECTED => Ok(EditorStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "حالة طلب غير صالحة '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

pub const DECISION_APPROVE: &str = "approve";
pub const DECISION_REJECT: &str = "reject";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorDecision {
    Approve,
    Reject,
}

impl FromStr for EditorDecision {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DECISION_APPROVE => Ok(EditorDecision::Approve),
            DECISION_REJECT => Ok(EditorDecision::Reject),
            _ => Err(ModerationError::InvalidDecision),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerationError {
    #[error("أنت محرر أو مدير بالفعل")]
    AlreadyPrivileged,

    #[error("طلبك للتحرير قيد المراجعة بالفعل")]
    AlreadyPending,

    #[error("لا يوجد طلب تحرير معلق لهذا المستخدم")]
    NoPendingRequest,

    #[error("إجراء غير صالح، استخدم approve أو reject")]
    InvalidDecision,

    #[error("لا يمكن تغيير دور المدير الرئيسي")]
    SuperAdminRoleProtected,

    #[error("لا يمكن حذف المدير الرئيسي")]
    SuperAdminUndeletable,
}

impl From<ModerationError> for CoreError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::SuperAdminRoleProtected | ModerationError::SuperAdminUndeletable => {
                CoreError::Forbidden(err.to_string())
            }
            _ => CoreError::Validation(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What to persist after a resolved editor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorResolution {
    pub status: EditorStatus,
    /// `Some` only on approval.
    pub new_role: Option<Role>,
    pub approved_by: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// A plain user with no pending request may ask to become an editor.
/// Previously rejected users may ask again.
pub fn check_editor_request(
    role: Role,
    status: Option<EditorStatus>,
) -> Result<(), ModerationError> {
    if role.is_privileged() {
        return Err(ModerationError::AlreadyPrivileged);
    }
    if status == Some(EditorStatus::Pending) {
        return Err(ModerationError::AlreadyPending);
    }
    Ok(())
}

/// Resolve a pending request. Approval promotes to editor and records the
/// approving admin; rejection only changes the status.
pub fn resolve_editor_request(
    admin_id: DbId,
    status: Option<EditorStatus>,
    decision: &str,
) -> Result<EditorResolution, ModerationError> {
    if status != Some(EditorStatus::Pending) {
        return Err(ModerationError::NoPendingRequest);
    }
    match decision.parse::<EditorDecision>()? {
        EditorDecision::Approve => Ok(EditorResolution {
            status: EditorStatus::Approved,
            new_role: Some(Role::Editor),
            approved_by: Some(admin_id),
        }),
        EditorDecision::Reject => Ok(EditorResolution {
            status: EditorStatus::Rejected,
            new_role: None,
            approved_by: None,
        }),
    }
}

/// A super-admin's role may only be changed by that same super-admin.
pub fn check_role_change(
    actor_id: DbId,
    target_id: DbId,
    target_role: Role,
) -> Result<(), ModerationError> {
    if target_role == Role::SuperAdmin && actor_id != target_id {
        return Err(ModerationError::SuperAdminRoleProtected);
    }
    Ok(())
}

/// Super-admins can never be deleted, not even by themselves.
pub fn check_user_deletion(target_role: Role) -> Result<(), ModerationError> {
    if target_role == Role::SuperAdmin {
        return Err(ModerationError::SuperAdminUndeletable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn plain_user_may_request() {
        assert!(check_editor_request(Role::User, None).is_ok());
        assert!(check_editor_request(Role::User, Some(EditorStatus::Rejected)).is_ok());
    }

    #[test]
    fn privileged_users_may_not_request() {
        for role in [Role::Editor, Role::Admin, Role::SuperAdmin] {
            assert_eq!(
                check_editor_request(role, None),
                Err(ModerationError::AlreadyPrivileged)
            );
        }
    }

    #[test]
    fn pending_request_blocks_another() {
        assert_eq!(
            check_editor_request(Role::User, Some(EditorStatus::Pending)),
            Err(ModerationError::AlreadyPending)
        );
    }

    #[test]
    fn approve_promotes_and_records_admin() {
        let res = resolve_editor_request(9, Some(EditorStatus::Pending), "approve").unwrap();
        assert_eq!(res.status, EditorStatus::Approved);
        assert_eq!(res.new_role, Some(Role::Editor));
        assert_eq!(res.approved_by, Some(9));
    }

    #[test]
    fn reject_leaves_role_untouched() {
        let res = resolve_editor_request(9, Some(EditorStatus::Pending), "reject").unwrap();
        assert_eq!(res.status, EditorStatus::Rejected);
        assert_eq!(res.new_role, None);
        assert_eq!(res.approved_by, None);
    }

    #[test]
    fn resolve_requires_pending_request() {
        assert_eq!(
            resolve_editor_request(9, None, "approve"),
            Err(ModerationError::NoPendingRequest)
        );
        assert_eq!(
            resolve_editor_request(9, Some(EditorStatus::Approved), "approve"),
            Err(ModerationError::NoPendingRequest)
        );
    }

    #[test]
    fn resolve_rejects_unknown_decision() {
        assert_eq!(
            resolve_editor_request(9, Some(EditorStatus::Pending), "maybe"),
            Err(ModerationError::InvalidDecision)
        );
    }

    #[test]
    fn super_admin_role_only_changeable_by_self() {
        assert_eq!(
            check_role_change(1, 2, Role::SuperAdmin),
            Err(ModerationError::SuperAdminRoleProtected)
        );
        assert!(check_role_change(2, 2, Role::SuperAdmin).is_ok());
        assert!(check_role_change(1, 2, Role::Admin).is_ok());
    }

    #[test]
    fn super_admin_never_deletable() {
        assert_eq!(
            check_user_deletion(Role::SuperAdmin),
            Err(ModerationError::SuperAdminUndeletable)
        );
        assert!(check_user_deletion(Role::Admin).is_ok());
    }

    #[test]
    fn moderation_errors_map_to_core_errors() {
        assert_matches!(
            CoreError::from(ModerationError::AlreadyPending),
            CoreError::Validation(_)
        );
        assert_matches!(
            CoreError::from(ModerationError::SuperAdminUndeletable),
            CoreError::Forbidden(_)
        );
    }
}
