//! # Caller Identity & Role Checks
//!
//! Thin role-based access control. The auth middleware resolves a
//! [`CallerIdentity`] per request and inserts it as an extension; handlers
//! take it as an explicit argument. There is no ambient "current user" —
//! every mutating code path receives the actor and passes it to audit
//! event emission.
//!
//! Roles:
//! - `admin` — full access.
//! - `faculty` — may create assessments and components.
//! - `coordinator` — read-only dashboard access.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Caller role, resolved per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Faculty,
    Coordinator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Faculty => "faculty",
            Self::Coordinator => "coordinator",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "faculty" => Some(Self::Faculty),
            "coordinator" => Some(Self::Coordinator),
            _ => None,
        }
    }
}

/// The authenticated caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub role: Role,
    /// Faculty record the caller is linked to, when known.
    pub faculty_id: Option<Uuid>,
}

impl CallerIdentity {
    /// Display form used for audit attribution, e.g. "faculty:3f0e…".
    pub fn actor(&self) -> String {
        match self.faculty_id {
            Some(id) => format!("{}:{id}", self.role.as_str()),
            None => self.role.as_str().to_string(),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("caller identity not established".to_string()))
    }
}

/// Require an exact role.
pub fn require_role(caller: &CallerIdentity, role: Role) -> Result<(), AppError> {
    if caller.role == role {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "requires role {}, caller has {}",
            role.as_str(),
            caller.role.as_str()
        )))
    }
}

/// Require a role allowed to mutate records (faculty or admin).
pub fn require_writer(caller: &CallerIdentity) -> Result<(), AppError> {
    match caller.role {
        Role::Admin | Role::Faculty => Ok(()),
        Role::Coordinator => Err(AppError::Forbidden(
            "coordinator role is read-only".to_string(),
        )),
    }
}

/// Resolve the caller for a request and run it.
///
/// When `ABET_AUTH_TOKEN` is configured the `Authorization: Bearer` header
/// must match it. The role comes from `x-abet-role` (default coordinator);
/// `x-abet-faculty-id` optionally links the caller to a faculty record.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = &state.config.auth_token {
        let provided = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if provided != Some(expected.as_str()) {
            return Err(AppError::Unauthorized(
                "missing or invalid bearer token".to_string(),
            ));
        }
    }

    let role = req
        .headers()
        .get("x-abet-role")
        .and_then(|v| v.to_str().ok())
        .map(|raw| {
            Role::parse(raw)
                .ok_or_else(|| AppError::Unauthorized(format!("unknown role {raw:?}")))
        })
        .transpose()?
        .unwrap_or(Role::Coordinator);

    let faculty_id = req
        .headers()
        .get("x-abet-faculty-id")
        .and_then(|v| v.to_str().ok())
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| AppError::Unauthorized(format!("malformed faculty id {raw:?}")))
        })
        .transpose()?;

    req.extensions_mut()
        .insert(CallerIdentity { role, faculty_id });
    Ok(next.run(req).await)
}
