use crate::dto::api_response::PagedResponse;
use crate::error::{Error, Result};
use crate::models::notification::{NewNotification, Notification};
use crate::utils::pagination::{PageQuery, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, recipient_role, kind, title, message, link, is_read, created_at";

/// In-app notification records. Recipients are addressed by `(id, role)`.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewNotification) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (recipient_id, recipient_role, kind, title, message, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(new.recipient_id)
        .bind(&new.recipient_role)
        .bind(&new.kind)
        .bind(&new.title)
        .bind(&new.message)
        .bind(&new.link)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(notification_id = %row.id, kind = %row.kind, "notification recorded");
        Ok(row)
    }

    /// Records a notification as a side effect of another operation; a
    /// failure is logged and does not fail the caller.
    pub async fn notify(&self, new: NewNotification) {
        let kind = new.kind.clone();
        let recipient_id = new.recipient_id;
        if let Err(err) = self.create(new).await {
            tracing::warn!(error = %err, kind = %kind, recipient_id = %recipient_id, "failed to record notification");
        }
    }

    pub async fn list(
        &self,
        recipient_id: Uuid,
        recipient_role: &str,
        unread_only: bool,
        query: PageQuery,
    ) -> Result<PagedResponse<Notification>> {
        let items = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {} FROM notifications
            WHERE recipient_id = $1 AND recipient_role = $2 AND (NOT $3 OR is_read = FALSE)
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(recipient_id)
        .bind(recipient_role)
        .bind(unread_only)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE recipient_id = $1 AND recipient_role = $2 AND (NOT $3 OR is_read = FALSE)
            "#,
        )
        .bind(recipient_id)
        .bind(recipient_role)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;

        Ok(PagedResponse::new(items, Pagination::from_query(&query, total)))
    }

    pub async fn unread_count(&self, recipient_id: Uuid, recipient_role: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND recipient_role = $2 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .bind(recipient_role)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn mark_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
        recipient_role: &str,
    ) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND recipient_id = $2 AND recipient_role = $3
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .bind(recipient_id)
        .bind(recipient_role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }

    pub async fn mark_all_read(&self, recipient_id: Uuid, recipient_role: &str) -> Result<u64> {
        let done = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND recipient_role = $2 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .bind(recipient_role)
        .execute(&self.pool)
        .await?;
        Ok(done.rows_affected())
    }
}
