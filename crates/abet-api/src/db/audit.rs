//! Audit event persistence. Append-only; rows are never updated or read
//! back into the store.

use sqlx::PgPool;

use crate::events::AuditEvent;

/// Append one audit event.
pub async fn insert(pool: &PgPool, event: &AuditEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_events
         (id, actor, action, target_kind, target_id, detail, recorded_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(event.id)
    .bind(&event.actor)
    .bind(&event.action)
    .bind(&event.target_kind)
    .bind(event.target_id)
    .bind(&event.detail)
    .bind(event.recorded_at)
    .execute(pool)
    .await?;
    Ok(())
}
