//! # Audit Event Emission
//!
//! Explicit post-write audit events. Write handlers call [`emit`] after a
//! successful mutation — there is no implicit observer dispatch, so the
//! data flow from mutation to event is visible at the call site.
//!
//! Emission is fire-and-forget: a failure to persist an event is logged
//! and swallowed. Score computation and write handling never block on,
//! and never fail because of, the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

/// One audit trail entry. Recomputable state never lives here — events
/// describe what happened, not what the scores were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    /// Actor attribution, e.g. "faculty:3f0e…" or "admin".
    pub actor: String,
    /// Verb, e.g. "create", "update".
    pub action: String,
    /// Record kind acted on, e.g. "assessment".
    pub target_kind: String,
    pub target_id: Uuid,
    pub detail: String,
    pub recorded_at: DateTime<Utc>,
}

/// Record an audit event for a completed write.
///
/// Appends to the in-memory trail synchronously; the Postgres insert (when
/// a pool is configured) runs on a detached task so the response is never
/// held up by the audit trail.
pub fn emit(
    state: &AppState,
    actor: String,
    action: &str,
    target_kind: &str,
    target_id: Uuid,
    detail: String,
) {
    let event = AuditEvent {
        id: Uuid::new_v4(),
        actor,
        action: action.to_string(),
        target_kind: target_kind.to_string(),
        target_id,
        detail,
        recorded_at: Utc::now(),
    };

    tracing::info!(
        actor = %event.actor,
        action = %event.action,
        target = %event.target_id,
        kind = %event.target_kind,
        "audit event"
    );

    state.records.audit_events.write().push(event.clone());

    if let Some(pool) = state.db.clone() {
        tokio::spawn(async move {
            if let Err(err) = crate::db::audit::insert(&pool, &event).await {
                tracing::warn!(error = %err, event = %event.id, "audit event not persisted");
            }
        });
    }
}
