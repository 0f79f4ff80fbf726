use crate::dto::api_response::PagedResponse;
use crate::dto::support_dto::{CreateTicketPayload, RespondTicketPayload};
use crate::error::{Error, Result};
use crate::models::notification::NewNotification;
use crate::models::support_ticket::{
    canonical, SupportTicket, TICKET_PRIORITIES, TICKET_STATUSES, TICKET_STATUS_OPEN,
    TICKET_STATUS_RESOLVED,
};
use crate::services::notification_service::NotificationService;
use crate::utils::pagination::{PageQuery, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

const TICKET_COLUMNS: &str = "id, submitter_id, submitter_role, subject, description, priority, status, admin_response, created_at, updated_at, resolved_at";
const DEFAULT_PRIORITY: &str = "Medium";

#[derive(Clone)]
pub struct SupportService {
    pool: PgPool,
    notifications: NotificationService,
}

impl SupportService {
    pub fn new(pool: PgPool, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    pub async fn create(
        &self,
        submitter_id: Uuid,
        submitter_role: &str,
        payload: CreateTicketPayload,
    ) -> Result<SupportTicket> {
        let priority = match payload.priority.as_deref() {
            None => DEFAULT_PRIORITY,
            Some(p) => canonical(&TICKET_PRIORITIES, p).ok_or_else(|| {
                Error::BadRequest(format!("Unknown priority '{}'; expected Low, Medium or High", p))
            })?,
        };

        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            INSERT INTO support_tickets (submitter_id, submitter_role, subject, description, priority, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(submitter_id)
        .bind(submitter_role)
        .bind(payload.subject.trim())
        .bind(payload.description.trim())
        .bind(priority)
        .bind(TICKET_STATUS_OPEN)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(ticket_id = %ticket.id, priority = %ticket.priority, "support ticket opened");
        Ok(ticket)
    }

    pub async fn list_own(
        &self,
        submitter_id: Uuid,
        submitter_role: &str,
        query: PageQuery,
    ) -> Result<PagedResponse<SupportTicket>> {
        let items = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            SELECT {} FROM support_tickets
            WHERE submitter_id = $1 AND submitter_role = $2
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
            TICKET_COLUMNS
        ))
        .bind(submitter_id)
        .bind(submitter_role)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM support_tickets WHERE submitter_id = $1 AND submitter_role = $2",
        )
        .bind(submitter_id)
        .bind(submitter_role)
        .fetch_one(&self.pool)
        .await?;

        Ok(PagedResponse::new(items, Pagination::from_query(&query, total)))
    }

    pub async fn get_own(
        &self,
        id: Uuid,
        submitter_id: Uuid,
        submitter_role: &str,
    ) -> Result<SupportTicket> {
        let ticket = self.get_by_id(id).await?;
        if ticket.submitter_id != submitter_id || ticket.submitter_role != submitter_role {
            // Hide other users' tickets entirely.
            return Err(Error::NotFound("Support ticket not found".to_string()));
        }
        Ok(ticket)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<SupportTicket> {
        sqlx::query_as::<_, SupportTicket>(&format!(
            "SELECT {} FROM support_tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Support ticket not found".to_string()))
    }

    pub async fn list_all(
        &self,
        status: Option<&str>,
        query: PageQuery,
    ) -> Result<PagedResponse<SupportTicket>> {
        let status = match status {
            None => None,
            Some(s) => Some(canonical(&TICKET_STATUSES, s).ok_or_else(|| {
                Error::BadRequest(format!("Unknown ticket status '{}'", s))
            })?),
        };

        let items = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            SELECT {} FROM support_tickets
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
            TICKET_COLUMNS
        ))
        .bind(status)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM support_tickets WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(PagedResponse::new(items, Pagination::from_query(&query, total)))
    }

    pub async fn respond(&self, id: Uuid, payload: RespondTicketPayload) -> Result<SupportTicket> {
        if payload.response.is_none() && payload.status.is_none() {
            return Err(Error::BadRequest(
                "Provide a response, a status or both".to_string(),
            ));
        }
        let status = match payload.status.as_deref() {
            None => None,
            Some(s) => Some(canonical(&TICKET_STATUSES, s).ok_or_else(|| {
                Error::BadRequest(format!("Unknown ticket status '{}'", s))
            })?),
        };
        self.get_by_id(id).await?;

        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            UPDATE support_tickets
            SET
                admin_response = COALESCE($2, admin_response),
                status = COALESCE($3, status),
                resolved_at = CASE WHEN $3::TEXT = $4 THEN NOW() ELSE resolved_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(id)
        .bind(&payload.response)
        .bind(status)
        .bind(TICKET_STATUS_RESOLVED)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(ticket_id = %ticket.id, status = %ticket.status, "support ticket updated");

        self.notifications
            .notify(NewNotification {
                recipient_id: ticket.submitter_id,
                recipient_role: ticket.submitter_role.clone(),
                kind: "support_ticket".to_string(),
                title: "Support ticket updated".to_string(),
                message: format!("Your ticket \"{}\" is now {}", ticket.subject, ticket.status),
                link: Some(format!("/support/tickets/{}", ticket.id)),
            })
            .await;

        Ok(ticket)
    }
}
