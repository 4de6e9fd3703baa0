//! # Security Context
//!
//! Identity attached to every authenticated request, and the role gate handlers call.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::response_types::ApiError;
use crate::constants::Role;

/// Inserted into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub user_id: i32,
    pub role: Role,
    pub session_id: Uuid,
}

impl SecurityContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_faculty(&self) -> bool {
        self.role == Role::Faculty
    }
}

/// Fail with 403 unless the caller's role is one of `allowed`
pub fn require_role(ctx: &SecurityContext, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&ctx.role) {
        return Ok(());
    }

    warn!(
        user_id = ctx.user_id,
        role = %ctx.role,
        "Role check failed"
    );
    Err(ApiError::authorization_error(format!(
        "Role '{}' may not access this resource",
        ctx.role
    )))
}
