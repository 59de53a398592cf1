use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::message::Message;

#[derive(Clone)]
pub struct MessageService {
    pool: PgPool,
}

impl MessageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn send(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        subject: &str,
        content: &str,
        reason: Option<&str>,
    ) -> Result<Message> {
        let recipient: Option<(Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM users WHERE id = $1"#)
                .bind(recipient_id)
                .fetch_optional(&self.pool)
                .await?;
        if recipient.is_none() {
            return Err(Error::NotFound("Recipient not found".to_string()));
        }

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, subject, content, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(subject)
        .bind(content)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn inbox(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"SELECT * FROM messages WHERE recipient_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    pub async fn mark_read(&self, user_id: Uuid, message_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"UPDATE messages SET is_read = TRUE WHERE id = $1 AND recipient_id = $2"#,
        )
        .bind(message_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Message not found".to_string()));
        }
        Ok(())
    }

    pub async fn for_recipient(&self, recipient_id: Uuid) -> Result<Vec<Message>> {
        self.inbox(recipient_id).await
    }
}
